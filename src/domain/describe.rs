use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Field metadata returned by `GET /v1/describe/{object}`.
pub struct DescribedField {
    pub name: String,
    pub label: String,
    /// Tenant-defined field (`Name__c`).
    pub custom: bool,
    pub selectable: bool,
    pub createable: bool,
    pub updateable: bool,
    pub filterable: bool,
    pub required: bool,
    /// Zuora type name (`text`, `picklist`, `boolean`, `decimal`, ...).
    pub field_type: String,
    pub max_length: Option<u32>,
}

impl DescribedField {
    /// Rust type used for this field in generated structs.
    pub fn rust_type(&self) -> &'static str {
        match self.field_type.as_str() {
            "boolean" => "bool",
            "integer" | "long" => "i64",
            "decimal" | "double" => "f64",
            _ => "String",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Object schema returned by the describe endpoint.
pub struct DescribedObject {
    pub name: String,
    pub fields: Vec<DescribedField>,
}

impl DescribedObject {
    /// Render the object as a serde-ready Rust struct.
    ///
    /// Required fields are plain values, everything else is wrapped in `Option`
    /// and skipped when unset. Custom fields are left out unless
    /// `include_custom` is set.
    pub fn to_rust_struct(&self, include_custom: bool) -> String {
        let mut out = String::new();
        out.push_str("#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]\n");
        let _ = writeln!(out, "pub struct {} {{", self.name);

        for field in self.fields.iter().filter(|f| include_custom || !f.custom) {
            let ident = rust_ident(&field.name);
            if field.required {
                let _ = writeln!(out, "    #[serde(rename = \"{}\")]", field.name);
                let _ = writeln!(out, "    pub {ident}: {},", field.rust_type());
            } else {
                let _ = writeln!(
                    out,
                    "    #[serde(rename = \"{}\", skip_serializing_if = \"Option::is_none\")]",
                    field.name
                );
                let _ = writeln!(out, "    pub {ident}: Option<{}>,", field.rust_type());
            }
        }

        out.push_str("}\n");
        out
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "yield",
];

/// `CreditCardCVV` -> `credit_card_cvv`, `Type` -> `r#type`.
fn rust_ident(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if KEYWORDS.contains(&out.as_str()) {
        out.insert_str(0, "r#");
    }
    out
}
