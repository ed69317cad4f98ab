//! HTML form rendering.
//!
//! Each page render owns a [`RenderContext`] that numbers the forms on the
//! page and remembers whether the CAPTCHA widget was already emitted.
//! Nothing is shared between renders.

use crate::captcha::widget_html;
use crate::config::CaptchaConfig;
use crate::contact::{Field, SubmissionOutcome, SubmittedForm};
use crate::i18n::I18n;
use crate::markup::{expand_directives, ContactDirective};

/// Prefix of the submit button name; the form id follows.
pub const SUBMIT_PREFIX: &str = "submit-form-";

/// Per-page rendering state.
#[derive(Debug, Clone)]
pub struct RenderContext {
    action: String,
    next_form_id: u32,
    captcha_rendered: bool,
}

impl RenderContext {
    /// Create a context for a page posting back to `action`.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            next_form_id: 1,
            captcha_rendered: false,
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Take the next form id. Ids start at 1.
    pub fn next_form_id(&mut self) -> u32 {
        let id = self.next_form_id;
        self.next_form_id += 1;
        id
    }

    /// Claim the CAPTCHA widget slot. Only the first call returns true.
    pub fn claim_captcha(&mut self) -> bool {
        !std::mem::replace(&mut self.captcha_rendered, true)
    }

    pub fn captcha_rendered(&self) -> bool {
        self.captcha_rendered
    }
}

/// Parse the form id out of a submit button name.
pub fn submitted_form_id(key: &str) -> Option<u32> {
    key.strip_prefix(SUBMIT_PREFIX)?.parse().ok()
}

/// Result of a submission, shown on the form it came from.
#[derive(Debug, Clone, Copy)]
pub struct Feedback<'a> {
    pub form_id: u32,
    pub form: &'a SubmittedForm,
    pub outcome: &'a SubmissionOutcome,
}

impl Feedback<'_> {
    fn failed(&self) -> bool {
        !self.outcome.is_success()
    }

    fn has_error(&self, field: Field) -> bool {
        self.outcome
            .validation()
            .is_some_and(|result| result.has_error(field))
    }

    /// Localised messages, escaped and joined by line breaks.
    fn message(&self, i18n: &I18n) -> String {
        let keys: Vec<&str> = match self.outcome {
            SubmissionOutcome::Rejected(result) => {
                result.errors().iter().map(|e| e.kind.message_key()).collect()
            }
            SubmissionOutcome::DeliveryFailed => vec!["error.unknown"],
            SubmissionOutcome::Delivered | SubmissionOutcome::Skipped => vec!["success"],
        };

        keys.iter()
            .map(|key| escape_html(i18n.t(key)))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Renders contact forms into HTML.
pub struct FormRenderer<'a> {
    i18n: &'a I18n,
    captcha: Option<&'a CaptchaConfig>,
    feedback: Option<Feedback<'a>>,
}

impl<'a> FormRenderer<'a> {
    pub fn new(i18n: &'a I18n) -> Self {
        Self {
            i18n,
            captcha: None,
            feedback: None,
        }
    }

    /// Emit the CAPTCHA widget when the configuration enables it.
    pub fn with_captcha(mut self, config: &'a CaptchaConfig) -> Self {
        self.captcha = config.enabled.then_some(config);
        self
    }

    /// Show the outcome of a submission on its form.
    pub fn with_feedback(mut self, feedback: Feedback<'a>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Render page source, replacing each directive with a form.
    pub fn render_page(&self, ctx: &mut RenderContext, source: &str) -> String {
        expand_directives(source, |directive| self.render_form(ctx, directive))
    }

    /// Render one form and advance the context.
    pub fn render_form(&self, ctx: &mut RenderContext, directive: &ContactDirective) -> String {
        let id = ctx.next_form_id();
        let feedback = self.feedback.filter(|f| f.form_id == id);

        let mut html = format!(
            "<form action=\"{action}#form-{id}\" method=\"POST\"><a name=\"form-{id}\"></a>\
             <table class=\"inline\">",
            action = escape_html(ctx.action()),
        );

        if let Some(feedback) = &feedback {
            let class = if feedback.failed() {
                "contact_error"
            } else {
                "contact_success"
            };
            html.push_str(&format!(
                "<tr><td colspan=\"2\"><p class=\"{class}\">{}</p></td></tr>",
                feedback.message(self.i18n)
            ));
        }

        html.push_str(&self.row(Field::Name, feedback.as_ref()));
        html.push_str(&self.row(Field::Email, feedback.as_ref()));
        if directive.subject.is_none() {
            html.push_str(&self.row(Field::Subject, feedback.as_ref()));
        }
        html.push_str(&self.row(Field::Content, feedback.as_ref()));

        if let Some(config) = self.captcha {
            if ctx.claim_captcha() {
                html.push_str(&format!(
                    "<tr><td colspan=\"2\">{}</td></tr>",
                    widget_html(config, self.i18n.locale())
                ));
            }
        }

        html.push_str("</table><p>");
        if let Some(subject) = &directive.subject {
            html.push_str(&hidden_input("subject", subject));
        }
        if let Some(to) = &directive.to {
            html.push_str(&hidden_input("to", to));
        }
        html.push_str(&format!(
            "<input type=\"submit\" name=\"{SUBMIT_PREFIX}{id}\" value=\"{}\" />",
            escape_html(self.i18n.t("contact"))
        ));
        html.push_str("</p></form>");

        html
    }

    fn row(&self, field: Field, feedback: Option<&Feedback<'_>>) -> String {
        let name = field.as_str();
        let label = escape_html(self.i18n.t(name));

        // Values are echoed back only so the user can fix a failed submission
        let value = feedback
            .filter(|f| f.failed())
            .map(|f| escape_html(f.form.value(field)))
            .unwrap_or_default();
        let class = if feedback.is_some_and(|f| f.has_error(field)) {
            " class=\"error_field\""
        } else {
            ""
        };

        let input = match field {
            Field::Content => format!(
                "<textarea name=\"{name}\" wrap=\"on\" cols=\"40\" rows=\"6\"{class}>{value}</textarea>"
            ),
            _ => format!("<input type=\"text\" value=\"{value}\" name=\"{name}\"{class}>"),
        };

        format!("<tr><td>{label}</td><td>{input}</td></tr>")
    }
}

fn hidden_input(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{name}\" value=\"{}\" />",
        escape_html(value)
    )
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap rendered content in a minimal HTML document.
pub fn page_document(title: &str, lang: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{content}\n</body>\n</html>\n",
        lang = escape_html(lang),
        title = escape_html(title),
    )
}
