//! Request-body validation for the book routes.
//!
//! Each route owns a list of [`Rule`]s. All rules run against the trimmed
//! field text before anything touches storage, and every failing rule
//! contributes one [`FieldError`].

use bookshelf_http::error::FieldError;
use serde::Deserialize;
use serde_json::Value;

use super::models::BookFields;

pub const NOT_EMPTY: &str = "Should not be empty";
pub const NUMERIC: &str = "Should be number, not empty";

/// Raw request body. Values stay untyped so numbers may arrive as JSON
/// numbers or as strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub author: Option<Value>,
    pub year: Option<Value>,
    pub number_pages: Option<Value>,
    pub cover: Option<Value>,
    pub description: Option<Value>,
}

impl BookForm {
    fn raw(&self, field: &str) -> Option<&Value> {
        match field {
            "id" => self.id.as_ref(),
            "title" => self.title.as_ref(),
            "author" => self.author.as_ref(),
            "year" => self.year.as_ref(),
            "number_pages" => self.number_pages.as_ref(),
            "cover" => self.cover.as_ref(),
            "description" => self.description.as_ref(),
            _ => None,
        }
    }

    /// Trimmed text of a field; absent, null, and structured values read as empty.
    pub fn text(&self, field: &str) -> String {
        match self.raw(field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => integral(n).map_or_else(|| n.to_string(), |i| i.to_string()),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}

/// Whole JSON numbers, including float spellings such as `1965.0`.
fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// One field check: the field name, the message reported on failure, and
/// the predicate applied to the trimmed text.
#[derive(Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&str) -> bool,
}

impl Rule {
    pub const fn new(field: &'static str, message: &'static str, check: fn(&str) -> bool) -> Self {
        Self {
            field,
            message,
            check,
        }
    }
}

fn not_empty(value: &str) -> bool {
    !value.is_empty()
}

fn numeric(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

const ID: Rule = Rule::new("id", NOT_EMPTY, not_empty);
const TITLE: Rule = Rule::new("title", NOT_EMPTY, not_empty);
const AUTHOR: Rule = Rule::new("author", NOT_EMPTY, not_empty);
const YEAR: Rule = Rule::new("year", NUMERIC, numeric);
const NUMBER_PAGES: Rule = Rule::new("number_pages", NUMERIC, numeric);
const COVER: Rule = Rule::new("cover", NOT_EMPTY, not_empty);
const DESCRIPTION: Rule = Rule::new("description", NOT_EMPTY, not_empty);

pub const CREATE_RULES: &[Rule] = &[TITLE, AUTHOR, YEAR, NUMBER_PAGES, COVER, DESCRIPTION];
pub const EDIT_RULES: &[Rule] = &[TITLE, AUTHOR, ID, YEAR, NUMBER_PAGES, COVER, DESCRIPTION];
pub const DELETE_RULES: &[Rule] = &[ID];

/// Run `rules` against `form`, collecting every failure in rule order.
pub fn check(form: &BookForm, rules: &[Rule]) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter(|rule| !(rule.check)(&form.text(rule.field)))
        .map(|rule| FieldError::body(rule.field, rule.message, form.raw(rule.field).cloned()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_create(form: &BookForm) -> Result<BookFields, Vec<FieldError>> {
    check(form, CREATE_RULES)?;
    book_fields(form)
}

/// Returns the trimmed id together with the replacement fields.
pub fn validate_edit(form: &BookForm) -> Result<(String, BookFields), Vec<FieldError>> {
    check(form, EDIT_RULES)?;
    Ok((form.text("id"), book_fields(form)?))
}

pub fn validate_delete(form: &BookForm) -> Result<String, Vec<FieldError>> {
    check(form, DELETE_RULES)?;
    Ok(form.text("id"))
}

fn book_fields(form: &BookForm) -> Result<BookFields, Vec<FieldError>> {
    Ok(BookFields {
        title: form.text("title"),
        author: form.text("author"),
        year: number(form, YEAR)?,
        number_pages: number(form, NUMBER_PAGES)?,
        cover: form.text("cover"),
        description: form.text("description"),
    })
}

fn number(form: &BookForm, rule: Rule) -> Result<i64, Vec<FieldError>> {
    form.text(rule.field).parse().map_err(|_| {
        vec![FieldError::body(
            rule.field,
            rule.message,
            form.raw(rule.field).cloned(),
        )]
    })
}
