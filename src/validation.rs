//! Field validation for submitted forms.

use crate::{
    dto::ads::{AdForm, UploadedPicture},
    error::{AppError, AppResult, FieldErrors},
};

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 200;
pub const TAG_MAX_CHARS: usize = 100;
pub const COMMENT_MIN_CHARS: usize = 3;
pub const COMMENT_MAX_CHARS: usize = 500;
pub const PASSWORD_MIN_CHARS: usize = 6;
/// Prices are stored in cents with at most 7 digits in total.
pub const PRICE_MAX_CENTS: i64 = 9_999_999;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// What an update does with the stored picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureChange {
    Keep,
    Replace { content_type: String, data: Vec<u8> },
    Clear,
}

/// An ad form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAd {
    pub title: String,
    pub text: String,
    pub price: Option<i64>,
    /// `None` when the form carried no tags field at all.
    pub tags: Option<Vec<String>>,
    pub picture: PictureChange,
}

pub fn validate_ad_form(form: AdForm, max_picture_bytes: usize) -> AppResult<ValidAd> {
    let mut errors = FieldErrors::new();

    let title = form.title.as_deref().map(str::trim).unwrap_or_default();
    let title_chars = title.chars().count();
    if title.is_empty() {
        errors.add("title", "This field is required.");
    } else if title_chars < TITLE_MIN_CHARS {
        errors.add("title", "Title must be greater than 2 characters");
    } else if title_chars > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("Ensure this value has at most {TITLE_MAX_CHARS} characters."),
        );
    }

    let text = form.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        errors.add("text", "This field is required.");
    }

    let price = match form.price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_price(raw) {
            Ok(cents) => Some(cents),
            Err(message) => {
                errors.add("price", message);
                None
            }
        },
    };

    let tags = match form.tags.as_deref() {
        None => None,
        Some(raw) => match parse_tags(raw) {
            Ok(tags) => Some(tags),
            Err(message) => {
                errors.add("tags", message);
                None
            }
        },
    };

    let picture = match form.picture.filter(|p| !p.data.is_empty()) {
        Some(upload) if upload.data.len() > max_picture_bytes => {
            errors.add("picture", picture_too_large_message(max_picture_bytes));
            PictureChange::Keep
        }
        Some(upload) => PictureChange::Replace {
            content_type: picture_content_type(&upload),
            data: upload.data,
        },
        None if form.picture_clear => PictureChange::Clear,
        None => PictureChange::Keep,
    };

    errors.into_result()?;

    Ok(ValidAd {
        title: title.to_string(),
        text: text.to_string(),
        price,
        tags,
        picture,
    })
}

/// Parse a decimal amount such as `12`, `12.5` or `0.99` into cents.
pub fn parse_price(raw: &str) -> Result<i64, &'static str> {
    let raw = raw.trim();
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err("Enter a number.");
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Enter a number.");
    }
    if frac.len() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.");
    }
    let whole = whole.trim_start_matches('0');
    if whole.len() > 5 {
        return Err("Ensure that there are no more than 7 digits in total.");
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| "Enter a number.")?
    };
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| "Enter a number.")? * 10,
        _ => frac.parse().map_err(|_| "Enter a number.")?,
    };

    let cents = whole_value * 100 + frac_value;
    debug_assert!(cents <= PRICE_MAX_CENTS);
    Ok(cents)
}

/// Split a comma-separated tag list into trimmed, lowercased, unique names.
pub fn parse_tags(raw: &str) -> Result<Vec<String>, String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        if tag.chars().count() > TAG_MAX_CHARS {
            return Err(format!(
                "Ensure each tag has at most {TAG_MAX_CHARS} characters."
            ));
        }
        tags.push(tag);
    }
    Ok(tags)
}

/// Trimmed comment text, or the field errors explaining why it was refused.
pub fn validate_comment(raw: &str) -> AppResult<String> {
    let mut errors = FieldErrors::new();
    let text = raw.trim();
    let chars = text.chars().count();
    if chars < COMMENT_MIN_CHARS {
        errors.add("comment", "Comment must be greater than 3 characters");
    } else if chars > COMMENT_MAX_CHARS {
        errors.add(
            "comment",
            format!("Ensure this value has at most {COMMENT_MAX_CHARS} characters."),
        );
    }
    errors.into_result()?;
    Ok(text.to_string())
}

/// Normalized email for a new account.
pub fn validate_registration(email: &str, password: &str) -> AppResult<String> {
    let mut errors = FieldErrors::new();
    let email = email.trim().to_lowercase();
    let looks_like_address = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !looks_like_address {
        errors.add("email", "Enter a valid email address.");
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters."),
        );
    }
    errors.into_result()?;
    Ok(email)
}

fn picture_content_type(upload: &UploadedPicture) -> String {
    upload
        .content_type
        .clone()
        .filter(|ct| !ct.is_empty() && ct != DEFAULT_CONTENT_TYPE)
        .or_else(|| {
            upload
                .file_name
                .as_deref()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.to_string())
        })
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// The rejection for an upload over the limit, also used when the request
/// body itself is cut off before the picture is fully read.
pub fn picture_too_large(max_picture_bytes: usize) -> AppError {
    let mut errors = FieldErrors::new();
    errors.add("picture", picture_too_large_message(max_picture_bytes));
    AppError::Validation(errors)
}

fn picture_too_large_message(max_picture_bytes: usize) -> String {
    format!("File must be < {}", describe_size(max_picture_bytes))
}

fn describe_size(bytes: usize) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MIB {
        format!("{:.1} MB", bytes / MIB)
    } else {
        format!("{:.1} KB", bytes / 1024.0)
    }
}
