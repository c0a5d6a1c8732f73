use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    routes::{ad_comments_path, ad_detail_path, ad_list_path},
    validation::{COMMENT_MAX_CHARS, COMMENT_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Decimal,
    File,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub help_text: Option<String>,
    /// Current value for edit forms.
    pub value: Option<String>,
}

impl FormField {
    fn new(name: &str, label: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required,
            min_length: None,
            max_length: None,
            help_text: None,
            value: None,
        }
    }

    fn lengths(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    fn help(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    fn value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }
}

/// What a client needs to render a form and submit it back.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FormDescriptor {
    pub action: String,
    pub method: String,
    pub enctype: String,
    pub fields: Vec<FormField>,
}

/// Current values of an ad, used to prefill the edit form.
#[derive(Debug, Default, Clone)]
pub struct AdPrefill {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub price: Option<i64>,
    pub tags: Vec<String>,
}

impl FormDescriptor {
    pub fn ad_form(prefill: AdPrefill) -> Self {
        let action = match prefill.id {
            Some(id) => ad_detail_path(id),
            None => ad_list_path(),
        };
        let price = prefill.price.map(format_cents);
        let tags = (!prefill.tags.is_empty()).then(|| prefill.tags.join(", "));
        Self {
            action,
            method: "POST".to_string(),
            enctype: "multipart/form-data".to_string(),
            fields: vec![
                FormField::new("title", "Title", FieldKind::Text, true)
                    .lengths(TITLE_MIN_CHARS, TITLE_MAX_CHARS)
                    .value(prefill.title),
                FormField::new("text", "Text", FieldKind::Textarea, true).value(prefill.text),
                FormField::new("price", "Price", FieldKind::Decimal, false).value(price),
                FormField::new("picture", "Picture", FieldKind::File, false)
                    .help("Image file, at most the configured upload size."),
                FormField::new("tags", "Tags", FieldKind::Tags, false)
                    .help("A comma-separated list of tags.")
                    .value(tags),
            ],
        }
    }

    pub fn comment_form(ad_id: Uuid) -> Self {
        Self {
            action: ad_comments_path(ad_id),
            method: "POST".to_string(),
            enctype: "application/json".to_string(),
            fields: vec![
                FormField::new("comment", "Comment", FieldKind::Textarea, true)
                    .lengths(COMMENT_MIN_CHARS, COMMENT_MAX_CHARS),
            ],
        }
    }
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ad_form_posts_to_list() {
        let form = FormDescriptor::ad_form(AdPrefill::default());
        assert_eq!(form.action, "/api/ads");
        assert!(form.fields.iter().all(|f| f.value.is_none()));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let id = Uuid::new_v4();
        let form = FormDescriptor::ad_form(AdPrefill {
            id: Some(id),
            title: Some("Bike".into()),
            text: Some("Red bike".into()),
            price: Some(15005),
            tags: vec!["bike".into(), "red".into()],
        });
        assert_eq!(form.action, format!("/api/ads/{id}"));
        let value = |name: &str| {
            form.fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.value.clone())
        };
        assert_eq!(value("price").as_deref(), Some("150.05"));
        assert_eq!(value("tags").as_deref(), Some("bike, red"));
    }

    #[test]
    fn comment_form_targets_the_ad() {
        let id = Uuid::new_v4();
        let form = FormDescriptor::comment_form(id);
        assert_eq!(form.action, format!("/api/ads/{id}/comments"));
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].min_length, Some(COMMENT_MIN_CHARS));
    }
}
