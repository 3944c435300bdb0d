//! Server-rendered registration page.
//!
//! Every dynamic value passes through [`escape_html`] before it reaches the
//! markup. Passwords are never echoed back.

use crate::domain::{Field, FieldErrors, RegistrationOutcome};

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, sans-serif; background: #f5f5f5; min-height: 100vh; display: flex; justify-content: center; align-items: center; padding: 20px; }
.container { background: white; border: 1px solid #ddd; border-radius: 5px; padding: 30px; max-width: 500px; width: 100%; }
h1 { color: #333; margin-bottom: 20px; text-align: center; font-size: 24px; }
.form-group { margin-bottom: 15px; }
label { display: block; margin-bottom: 5px; color: #333; }
input[type="text"], input[type="email"], input[type="password"] { width: 100%; padding: 10px; border: 1px solid #ccc; border-radius: 3px; font-size: 14px; }
input:focus { outline: none; border-color: #4a90e2; }
.error { color: #d32f2f; font-size: 12px; margin-top: 5px; display: block; }
.success { background-color: #e8f5e9; color: #2e7d32; padding: 12px; border-radius: 3px; margin-bottom: 15px; border: 1px solid #c8e6c9; }
.error-general { background-color: #ffebee; color: #c62828; padding: 12px; border-radius: 3px; margin-bottom: 15px; border: 1px solid #ffcdd2; }
button[type="submit"] { width: 100%; padding: 12px; background: #4a90e2; color: white; border: none; border-radius: 3px; font-size: 16px; cursor: pointer; }
button[type="submit"]:hover { background: #357abd; }
small { color: #666; font-size: 12px; display: block; margin-top: 5px; }
"#;

const PASSWORD_HINT: &str = "Password must be at least 8 characters and contain uppercase, \
     lowercase, number, and special character.";

/// Escape `& < > " '` for safe inclusion in element text or quoted
/// attribute values.
///
/// # Examples
/// ```
/// use signup::inbound::http::page::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">'&'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// View model for one render of the registration page.
#[derive(Debug, Default)]
pub struct RegistrationPage<'a> {
    name: &'a str,
    email: &'a str,
    success: Option<&'a str>,
    errors: Option<&'a FieldErrors>,
}

impl<'a> RegistrationPage<'a> {
    /// The empty form.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Page for a processed submission.
    ///
    /// On success the inputs are cleared; otherwise the submitted `name` and
    /// `email` are echoed back next to their errors.
    #[must_use]
    pub fn for_outcome(name: &'a str, email: &'a str, outcome: &'a RegistrationOutcome) -> Self {
        match outcome {
            RegistrationOutcome::Registered { message } => Self {
                success: Some(message.as_str()),
                ..Self::default()
            },
            RegistrationOutcome::Rejected(errors) => Self {
                name,
                email,
                success: None,
                errors: Some(errors),
            },
        }
    }

    fn error(&self, field: Field) -> Option<&'a str> {
        self.errors.and_then(|errors| errors.get(field))
    }

    fn field_error(&self, html: &mut String, field: Field) {
        if let Some(message) = self.error(field) {
            html.push_str("\n      <span class=\"error\">");
            html.push_str(&escape_html(message));
            html.push_str("</span>");
        }
    }

    fn input(&self, html: &mut String, field: Field, label: &str, kind: &str, value: Option<&str>) {
        let id = field.as_str();
        html.push_str(&format!(
            "\n    <div class=\"form-group\">\n      <label for=\"{id}\">{label}</label>\n      \
             <input type=\"{kind}\" id=\"{id}\" name=\"{id}\""
        ));
        if let Some(value) = value {
            html.push_str(" value=\"");
            html.push_str(&escape_html(value));
            html.push('"');
        }
        html.push_str(" required>");
        self.field_error(html, field);
        if field == Field::Password {
            html.push_str("\n      <small>");
            html.push_str(PASSWORD_HINT);
            html.push_str("</small>");
        }
        html.push_str("\n    </div>");
    }

    fn banner(html: &mut String, class: &str, message: &str) {
        html.push_str(&format!(
            "\n  <div class=\"{class}\">{}</div>",
            escape_html(message)
        ));
    }

    /// Render the complete HTML document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
             <title>User Registration</title>\n  <style>{STYLE}</style>\n</head>\n<body>\n\
             <div class=\"container\">\n  <h1>User Registration</h1>"
        ));
        if let Some(message) = self.success {
            Self::banner(&mut html, "success", message);
        }
        if let Some(message) = self.error(Field::General) {
            Self::banner(&mut html, "error-general", message);
        }
        html.push_str("\n  <form method=\"POST\" action=\"/register\">");
        self.input(&mut html, Field::Name, "Name:", "text", Some(self.name));
        self.input(&mut html, Field::Email, "Email Address:", "email", Some(self.email));
        self.input(&mut html, Field::Password, "Password:", "password", None);
        self.input(
            &mut html,
            Field::ConfirmPassword,
            "Confirm Password:",
            "password",
            None,
        );
        html.push_str(
            "\n    <button type=\"submit\">Register</button>\n  </form>\n</div>\n</body>\n</html>\n",
        );
        html
    }
}
