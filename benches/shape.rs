#[macro_use]
extern crate bencher;

use bencher::Bencher;
use graphql_shape::{build_operation, decode_into, shape, OperationKind, Variables, ID};

shape! {
    #[derive(Default)]
    struct Query {
        #[graphql("repository(owner: $owner, name: $name)")]
        repository: Option<Repository>,
    }
}

shape! {
    #[derive(Default)]
    struct Repository {
        id: ID,
        name_with_owner: String,
        stargazer_count: i64,
        #[graphql("issues(first: 100)")]
        issues: Connection,
    }
}

shape! {
    #[derive(Default)]
    struct Connection {
        nodes: Vec<Node>,
    }
}

shape! {
    #[derive(Default)]
    struct Node {
        #[graphql("__typename")]
        typename: String,
        #[graphql("... on Issue")]
        issue: Option<Issue>,
        #[graphql("... on PullRequest")]
        pull_request: Option<PullRequest>,
    }
}

shape! {
    #[derive(Default)]
    struct Issue {
        title: String,
        number: i32,
    }
}

shape! {
    #[derive(Default)]
    struct PullRequest {
        title: String,
        number: i32,
        merged: bool,
    }
}

fn response() -> String {
    let nodes: Vec<String> = (0..100)
        .map(|number| {
            if number % 2 == 0 {
                format!(
                    r#"{{"__typename":"Issue","title":"Issue \"{0}\"","number":{0}}}"#,
                    number
                )
            } else {
                format!(
                    r#"{{"__typename":"PullRequest","title":"PR {0}","number":{0},"merged":true}}"#,
                    number
                )
            }
        })
        .collect();
    format!(
        r#"{{"repository":{{"id":"MDEwOlJlcG9zaXRvcnk=","nameWithOwner":"octo/hello","stargazerCount":42,"issues":{{"nodes":[{}]}}}}}}"#,
        nodes.join(",")
    )
}

fn build_query_operation(bench: &mut Bencher) {
    let variables = Variables::new()
        .with("owner", "octo")
        .unwrap()
        .with("name", "hello")
        .unwrap();
    bench.iter(|| build_operation::<Query>(OperationKind::Query, &variables).unwrap());
}

fn decode_query_response(bench: &mut Bencher) {
    let json = response();
    bench.iter(|| {
        let mut query = Query::default();
        decode_into(json.as_bytes(), &mut query).unwrap();
        query
    });
}

fn decode_query_response_serde_json(bench: &mut Bencher) {
    let json = response();
    bench.iter(|| serde_json::from_str::<serde_json::Value>(&json).unwrap());
}

benchmark_group!(
    shape,
    build_query_operation,
    decode_query_response,
    decode_query_response_serde_json
);
benchmark_main!(shape);
