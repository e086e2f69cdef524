//! Text rendering of [`Yaml`] nodes
//!
//! Rendering is a pure function of the node and the indentation level.
//! Every collection entry starts on a new line, so a rendered collection
//! begins with `\n`; [`Yaml::to_yaml_string`] strips it for whole documents.

use super::Yaml;

const INDENT: &str = "  ";

impl Yaml {
    /// Renders this node at the given indentation level.
    ///
    /// Nested content is indented by two spaces per level.
    #[must_use]
    pub fn render(&self, indentation: usize) -> String {
        let mut out = String::new();
        self.render_into(&mut out, indentation);
        out
    }

    /// Renders this node as a complete document terminated by a newline.
    #[must_use]
    pub fn to_yaml_string(&self) -> String {
        let rendered = self.render(0);
        let mut text = rendered
            .strip_prefix('\n')
            .map_or(rendered.clone(), str::to_string);
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    fn render_into(&self, out: &mut String, indentation: usize) {
        match self {
            Self::String(value) => render_string(out, value, indentation),
            Self::Integer(value) => out.push_str(&value.to_string()),
            Self::Float(value) => out.push_str(&format_float(*value)),
            Self::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            Self::Null => out.push_str("null"),
            Self::List(items) if items.is_empty() => out.push_str("[]"),
            Self::List(items) => {
                for item in items {
                    begin_entry(out, indentation);
                    out.push('-');
                    render_list_item(out, item, indentation + 1);
                }
            }
            Self::Map(mapping) if mapping.is_empty() => out.push_str("{}"),
            Self::Map(mapping) => {
                for (key, value) in mapping.iter() {
                    begin_entry(out, indentation);
                    key.render_into(out, indentation + 1);
                    out.push(':');
                    if is_block(value) {
                        value.render_into(out, indentation + 1);
                    } else {
                        out.push(' ');
                        value.render_into(out, indentation + 1);
                    }
                }
            }
        }
    }
}

fn is_block(value: &Yaml) -> bool {
    match value {
        Yaml::List(items) => !items.is_empty(),
        Yaml::Map(mapping) => !mapping.is_empty(),
        _ => false,
    }
}

/// Starts a new line unless the previous output (a block literal) already did.
fn begin_entry(out: &mut String, indentation: usize) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    push_indent(out, indentation);
}

fn push_indent(out: &mut String, indentation: usize) {
    for _ in 0..indentation {
        out.push_str(INDENT);
    }
}

/// Collections inside a list start on the dash line: `- job: a`.
fn render_list_item(out: &mut String, item: &Yaml, indentation: usize) {
    out.push(' ');
    if is_block(item) {
        let nested = item.render(indentation);
        let prefix_len = 1 + INDENT.len() * indentation;
        out.push_str(nested.get(prefix_len..).unwrap_or_default());
    } else {
        item.render_into(out, indentation);
    }
}

fn render_string(out: &mut String, value: &str, indentation: usize) {
    if value.contains('\n') {
        out.push('|');
        for line in value.split('\n') {
            out.push('\n');
            push_indent(out, indentation + 1);
            out.push_str(line);
        }
        out.push('\n');
    } else if value.trim().is_empty() {
        out.push_str("''");
    } else if value.contains(':') {
        out.push('\'');
        out.push_str(&value.replace('\'', "''"));
        out.push('\'');
    } else {
        out.push_str(value);
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}
