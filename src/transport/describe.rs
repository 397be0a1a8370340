use serde::Deserialize;

use crate::domain::{DescribedField, DescribedObject};
use crate::transport::TransportError;

#[derive(Debug, Deserialize)]
struct ObjectXml {
    name: String,
    #[serde(default)]
    fields: FieldsXml,
}

#[derive(Debug, Default, Deserialize)]
struct FieldsXml {
    #[serde(default)]
    field: Vec<FieldXml>,
}

#[derive(Debug, Deserialize)]
struct FieldXml {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    custom: bool,
    #[serde(default)]
    selectable: bool,
    #[serde(default)]
    createable: bool,
    #[serde(default)]
    updateable: bool,
    #[serde(default)]
    filterable: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    maxlength: Option<String>,
    #[serde(default, rename = "type")]
    field_type: String,
}

impl From<FieldXml> for DescribedField {
    fn from(value: FieldXml) -> Self {
        Self {
            max_length: value
                .maxlength
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok()),
            name: value.name,
            label: value.label,
            custom: value.custom,
            selectable: value.selectable,
            createable: value.createable,
            updateable: value.updateable,
            filterable: value.filterable,
            required: value.required,
            field_type: value.field_type,
        }
    }
}

pub fn decode_describe_xml_response(xml: &str) -> Result<DescribedObject, TransportError> {
    let parsed: ObjectXml = quick_xml::de::from_str(xml)?;
    Ok(DescribedObject {
        name: parsed.name,
        fields: parsed.fields.field.into_iter().map(Into::into).collect(),
    })
}
