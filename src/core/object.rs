use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// An untyped (JSON) object from which [TypedParameters](TypedParameter) can
/// be read.
///
/// The Core API returns its bodies without a fixed schema and the SDK's
/// responses are equally loose; this wrapper carries them verbatim while
/// still letting the translators pull out strongly typed fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UntypedObject(pub(crate) Map<String, Json>);

/// A strongly typed field of an [UntypedObject], keyed by its wire name.
pub trait TypedParameter:
    TryFrom<Json, Error = anyhow::Error> + TryInto<Json> + Clone + std::fmt::Debug
{
    const KEY: &'static str;
}

impl UntypedObject {
    /// Read a [TypedParameter], if present.
    ///
    /// Note that this method clones the underlying data.
    pub fn get<T: TypedParameter>(&self) -> Option<Result<T>> {
        Some(self.0.get(T::KEY)?.clone().try_into().map_err(Into::into))
    }
}

impl From<Map<String, Json>> for UntypedObject {
    fn from(map: Map<String, Json>) -> Self {
        Self(map)
    }
}

impl From<UntypedObject> for Json {
    fn from(value: UntypedObject) -> Self {
        value.0.into()
    }
}

impl TryFrom<Json> for UntypedObject {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        match value {
            Json::Object(map) => Ok(Self(map)),
            other => bail!("expected a JSON object, found: {other}"),
        }
    }
}
