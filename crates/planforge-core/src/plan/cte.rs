use serde::Serialize;

///
/// CteDefinition
///
/// One common table expression of a statement. Shared by `Arc` between the
/// producing node and every consuming reference; only the producer owns the
/// materializing subplans.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CteDefinition {
    pub id: u32,
    pub name: String,
    pub recursive: bool,
}

impl CteDefinition {
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, recursive: bool) -> Self {
        Self {
            id,
            name: name.into(),
            recursive,
        }
    }
}
