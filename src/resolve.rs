//! Follows `#/components/<section>/<name>` references to their definition.

use indexmap::IndexMap;
use openapiv3::ReferenceOr;

use crate::error::{Error, Result};
use crate::spec::{Components, Parameter, RequestBody, Response};

const MAX_REFERENCE_DEPTH: usize = 32;

/// An object that can live under `components` and be referenced from
/// elsewhere in the document.
pub trait Component: Sized {
    /// Section name under `#/components/`.
    const SECTION: &'static str;

    fn section(components: &Components) -> &IndexMap<String, ReferenceOr<Self>>;
}

impl Component for Parameter {
    const SECTION: &'static str = "parameters";

    fn section(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.parameters
    }
}

impl Component for RequestBody {
    const SECTION: &'static str = "requestBodies";

    fn section(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.request_bodies
    }
}

impl Component for Response {
    const SECTION: &'static str = "responses";

    fn section(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.responses
    }
}

/// Returns the concrete object behind `item`, following reference chains.
pub fn resolve<'a, T: Component>(
    components: &'a Components,
    item: &'a ReferenceOr<T>,
) -> Result<&'a T> {
    match item {
        ReferenceOr::Item(item) => Ok(item),
        ReferenceOr::Reference { reference } => resolve_reference(components, reference),
    }
}

pub fn resolve_reference<'a, T: Component>(
    components: &'a Components,
    reference: &str,
) -> Result<&'a T> {
    let mut current = reference;
    for _ in 0..MAX_REFERENCE_DEPTH {
        let name = strip_section::<T>(current)?;
        let entry = T::section(components)
            .get(name)
            .ok_or_else(|| Error::UnresolvedReference {
                section: T::SECTION,
                name: name.to_owned(),
            })?;

        match entry {
            ReferenceOr::Item(item) => return Ok(item),
            ReferenceOr::Reference { reference: next } => {
                tracing::trace!(from = current, to = %next, "following reference");
                current = next;
            }
        }
    }

    Err(Error::ReferenceDepthExceeded {
        reference: reference.to_owned(),
    })
}

fn strip_section<T: Component>(reference: &str) -> Result<&str> {
    let prefix = format!("#/components/{}/", T::SECTION);
    reference
        .strip_prefix(&prefix)
        .ok_or_else(|| Error::UnsupportedReference {
            reference: reference.to_owned(),
            expected: prefix.clone(),
        })
}
