use crate::error::{AppError, FieldError};
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

// ---------------------------------------------------------------------------
// JsonBody
// ---------------------------------------------------------------------------

/// `Json<Value>` whose rejection is rendered in the API's error envelope.
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(Self(value))
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Collects every field problem in a request body before failing, so the
/// caller sees all of them at once.
pub struct Checks<'a> {
    body: &'a Value,
    errors: Vec<FieldError>,
}

impl<'a> Checks<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self {
            body,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    }

    /// String whose length in characters lies in `min..=max`.
    pub fn string(mut self, field: &str, min: usize, max: usize) -> Self {
        match self.body.get(field) {
            Some(Value::String(s)) => {
                let len = s.chars().count();
                if len < min || len > max {
                    self.fail(field, format!("must be between {min} and {max} characters"));
                }
            }
            _ => self.fail(field, "must be a string".to_string()),
        }
        self
    }

    pub fn object(mut self, field: &str) -> Self {
        if !matches!(self.body.get(field), Some(Value::Object(_))) {
            self.fail(field, "must be an object".to_string());
        }
        self
    }

    pub fn array(mut self, field: &str) -> Self {
        if !matches!(self.body.get(field), Some(Value::Array(_))) {
            self.fail(field, "must be an array".to_string());
        }
        self
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(self.errors))
        }
    }
}

static NULL: Value = Value::Null;

/// Field value or JSON null when absent.
pub fn field<'a>(body: &'a Value, name: &str) -> &'a Value {
    body.get(name).unwrap_or(&NULL)
}

/// JavaScript-style truthiness, used where a field must be "filled in".
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_problems_reported() {
        let body = json!({ "taskDescription": "abc", "projectContext": 5 });
        let err = Checks::new(&body)
            .string("taskDescription", 5, 500)
            .string("projectContext", 0, 2000)
            .finish()
            .unwrap_err();
        let msg = format!("{}", err.0);
        assert_eq!(msg, "Invalid input");
    }

    #[test]
    fn bounds_are_inclusive() {
        let body = json!({ "query": "ok", "ctx": {}, "list": [] });
        assert!(Checks::new(&body)
            .string("query", 2, 2)
            .object("ctx")
            .array("list")
            .finish()
            .is_ok());
    }

    #[test]
    fn length_counts_characters() {
        let body = json!({ "q": "éé" });
        assert!(Checks::new(&body).string("q", 2, 2).finish().is_ok());
    }

    #[test]
    fn missing_fields_fail() {
        let body = json!({});
        assert!(Checks::new(&body).object("projectData").finish().is_err());
        assert!(Checks::new(&body).array("communications").finish().is_err());
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
    }
}
