use crate::error::{Error, ErrorType, Result};
use crate::shape::{type_mismatch, Kind, Scalar, Shape};

/// One step from a shape towards one of its descendants.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Step {
    /// The member at an index in declaration order.
    Member(usize),
    /// The list element at an index.
    Element(usize),
}

/// A location inside the destination that an incoming JSON value may be written to.
///
/// A receiver doesn't borrow the destination. It's a path from the destination's root, which is
/// only followed once a property or value arrives for it, so that optional members along the way
/// are materialized only when the response actually contains them.
#[derive(Debug, Clone)]
pub(crate) struct Receiver {
    path: Vec<Step>,
    kind: Kind,
}

impl Receiver {
    fn child(&self, step: Step, kind: Kind) -> Receiver {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(step);
        Receiver { path, kind }
    }

    /// Follow this receiver's path from the root, materializing optional values on the way.
    fn resolve<'r>(&self, root: &'r mut dyn Shape) -> Result<&'r mut dyn Shape> {
        let mut current = root;
        for step in self.path.iter() {
            let next = match *step {
                Step::Member(index) => current.member_mut(index),
                Step::Element(index) => current.element_mut(index),
            };
            current = next.ok_or_else(|| {
                Error::new(
                    format!("Shape has no destination at {:?}", step),
                    ErrorType::InvalidShape,
                )
            })?;
        }
        Ok(current)
    }
}

/// An ordered set of receivers that share a position in the incoming JSON.
#[derive(Debug, Clone, Default)]
pub(crate) struct Receivers {
    items: Vec<Receiver>,
}

impl Receivers {
    /// The set for the destination's root object, fanned out into its inline members.
    pub(crate) fn root(kind: Kind) -> Receivers {
        let mut receivers = Receivers::default();
        receivers.add(Receiver {
            path: Vec::new(),
            kind,
        });
        receivers
    }

    /// Add a receiver along with every inline member and inline fragment reachable from it.
    pub(crate) fn add(&mut self, receiver: Receiver) {
        let mut ancestors = Vec::new();
        self.fan_out(receiver, &mut ancestors);
    }

    fn fan_out(&mut self, receiver: Receiver, ancestors: &mut Vec<&'static str>) {
        let object = receiver.kind.object();
        self.items.push(receiver);
        let object = match object {
            Some(object) => object,
            None => return,
        };
        let index = self.items.len() - 1;
        ancestors.push(object.name());
        for (member, field) in object.fields().iter().enumerate() {
            let kind = field.kind();
            // Types already on the expansion path are left out entirely.
            let expand = match kind.object() {
                Some(child) => field.info().is_fan_out() && !ancestors.contains(&child.name()),
                None => false,
            };
            if expand {
                let child = self.items[index].child(Step::Member(member), kind);
                self.fan_out(child, ancestors);
            }
        }
        ancestors.pop();
    }

    /// Returns the receivers of a property, matched case-insensitively against the field names of
    /// every receiver in this set, or `None` if no receiver declares the property.
    ///
    /// Every receiver that declares the property is materialized, so that an optional branch
    /// exists once any of its properties arrives, even when the property's value is `null`.
    pub(crate) fn map_property_name(
        &self,
        root: &mut dyn Shape,
        name: &str,
    ) -> Result<Option<Receivers>> {
        let mut receivers = Receivers::default();
        for receiver in self.items.iter() {
            let object = match receiver.kind.object() {
                Some(object) => object,
                None => continue,
            };
            for (member, field) in object.fields().iter().enumerate() {
                let field_name = field.info().field_name();
                if !field_name.is_empty() && field_name.eq_ignore_ascii_case(name) {
                    let child = receiver.child(Step::Member(member), field.kind());
                    child.resolve(root)?;
                    receivers.add(child);
                }
            }
        }
        if receivers.items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(receivers))
        }
    }

    /// Appends a new element to every list in this set and returns the set of new elements.
    pub(crate) fn map_array_element(&self, root: &mut dyn Shape) -> Result<Receivers> {
        let mut receivers = Receivers::default();
        for receiver in self.items.iter() {
            let element = receiver
                .kind
                .element()
                .ok_or_else(|| type_mismatch::<dyn Shape>("array"))?;
            let index = receiver.resolve(root)?.list_push()?;
            receivers.add(receiver.child(Step::Element(index), element));
        }
        Ok(receivers)
    }

    /// Empties every list in this set before an array's elements are appended to them.
    pub(crate) fn reset_lists(&self, root: &mut dyn Shape) -> Result<()> {
        for receiver in self.items.iter() {
            receiver.resolve(root)?.list_reset()?;
        }
        Ok(())
    }

    /// Checks that every receiver in this set is able to receive a JSON object.
    pub(crate) fn expect_objects(&self) -> Result<()> {
        match self.items.iter().find(|receiver| receiver.kind.object().is_none()) {
            Some(receiver) => Err(Error::new(
                format!("Cannot decode JSON object into {:?}", receiver.kind),
                ErrorType::TypeMismatch,
            )),
            None => Ok(()),
        }
    }

    /// Writes a leaf value into every receiver in this set.
    pub(crate) fn write(&self, root: &mut dyn Shape, value: &Scalar<'_>) -> Result<()> {
        for receiver in self.items.iter() {
            receiver.resolve(root)?.write_scalar(value)?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}
