use super::receivers::Receivers;
use super::tokens::{JsonToken, TokenReader};
use crate::error::{Error, ErrorType, Result};
use crate::shape::Shape;

/// Decode a JSON object into a shape, in place.
///
/// Every property of the JSON object is written into the member, or members, that the shape
/// declares for it; members without a corresponding property keep their current value. An optional
/// object is materialized once any of its properties arrives, while an optional leaf stays `None`
/// for a `null` value. Lists are emptied before the elements of a JSON array are appended to them.
///
/// When an error is returned, the destination may have been written to partially and should be
/// discarded.
///
/// ```
/// use graphql_shape::{decode_into, shape};
///
/// shape! {
///     #[derive(Debug, Default)]
///     struct Viewer {
///         login: String,
///         stargazer_count: Option<i64>,
///     }
/// }
///
/// let mut viewer = Viewer::default();
/// decode_into(br#"{"login":"octocat","stargazerCount":null}"#, &mut viewer).unwrap();
/// assert_eq!(viewer.login, "octocat");
/// assert_eq!(viewer.stargazer_count, None);
/// ```
pub fn decode_into<T: Shape>(json: &[u8], shape: &mut T) -> Result<()> {
    let kind = T::kind();
    if kind.object().is_none() {
        return Err(Error::new(
            format!(
                "Invalid decode destination: {} is not an object shape",
                std::any::type_name::<T>()
            ),
            ErrorType::InvalidShape,
        ));
    }
    let source = std::str::from_utf8(json).map_err(|err| {
        Error::new(
            format!("JSON input is not valid UTF-8: {}", err),
            ErrorType::MalformedJson,
        )
    })?;
    let arena = bumpalo::Bump::new();
    let mut decoder = Decoder {
        reader: TokenReader::new(source, &arena),
        root: shape,
        frames: Vec::new(),
    };
    decoder.decode(Receivers::root(kind))
}

/// A decode frame: the JSON container that's currently open and its receivers.
struct Frame {
    in_object: bool,
    receivers: Receivers,
}

/// Decoder state for a single call to [decode_into].
struct Decoder<'a, 'r> {
    reader: TokenReader<'a>,
    root: &'r mut dyn Shape,
    frames: Vec<Frame>,
}

impl<'a, 'r> Decoder<'a, 'r> {
    fn decode(&mut self, receivers: Receivers) -> Result<()> {
        match self.reader.next_required()? {
            JsonToken::ObjectStart => self.push(true, receivers),
            _ => {
                return Err(self
                    .reader
                    .error("JSON value must be an object", ErrorType::MalformedJson))
            }
        }

        // The receivers of the property whose value comes next.
        let mut property: Option<Receivers> = None;
        let mut properties = 0usize;
        while let Some(frame) = self.frames.last() {
            let token = self.reader.next_required()?;
            let receivers = match token {
                JsonToken::ObjectEnd | JsonToken::ArrayEnd => {
                    self.pop();
                    continue;
                }
                JsonToken::Key(name) => {
                    properties += 1;
                    let matched = frame
                        .receivers
                        .map_property_name(&mut *self.root, name)
                        .map_err(|err| self.reader.locate(err))?;
                    property = Some(matched.ok_or_else(|| {
                        self.reader.error(
                            format!("No destination for JSON property \"{}\"", name),
                            ErrorType::NoMatchingReceiver,
                        )
                    })?);
                    continue;
                }
                _ if frame.in_object => property.take().ok_or_else(|| {
                    self.reader
                        .error("Expected a JSON property name", ErrorType::MalformedJson)
                })?,
                _ => {
                    let receivers = frame.receivers.map_array_element(&mut *self.root);
                    receivers.map_err(|err| self.reader.locate(err))?
                }
            };
            self.value(token, receivers)
                .map_err(|err| self.reader.locate(err))?;
        }

        // The root object is closed and the reader rejects any token after it.
        self.reader.next_token()?;
        tracing::debug!(properties, "decoded JSON response");
        Ok(())
    }

    fn value(&mut self, token: JsonToken<'a>, receivers: Receivers) -> Result<()> {
        match token {
            JsonToken::ObjectStart => {
                receivers.expect_objects()?;
                self.push(true, receivers);
            }
            JsonToken::ArrayStart => {
                receivers.reset_lists(&mut *self.root)?;
                self.push(false, receivers);
            }
            // Absent values keep the destination as it is.
            JsonToken::Null => {}
            JsonToken::Scalar(value) => receivers.write(&mut *self.root, &value)?,
            JsonToken::ObjectEnd | JsonToken::ArrayEnd | JsonToken::Key(_) => {}
        }
        Ok(())
    }

    #[inline]
    fn push(&mut self, in_object: bool, receivers: Receivers) {
        tracing::trace!(
            depth = self.frames.len() + 1,
            in_object,
            receivers = receivers.len(),
            "push decode frame"
        );
        self.frames.push(Frame {
            in_object,
            receivers,
        });
    }

    #[inline]
    fn pop(&mut self) {
        self.frames.pop();
        tracing::trace!(depth = self.frames.len(), "pop decode frame");
    }
}
