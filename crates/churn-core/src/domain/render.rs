use std::collections::BTreeMap;

/// Variables available to generator templates.
///
/// Templates reference them as `{{NAME}}`. Placeholders without a matching
/// variable are left untouched, so `${{ secrets.X }}` in CI files and
/// `{{ checksum "package.json" }}` in CircleCI keys survive rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every known `{{KEY}}` in `template`.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}
