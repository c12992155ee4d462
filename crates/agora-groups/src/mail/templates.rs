//! E-mail templates.

use agora_core::models::user::User;

use crate::i18n::{Arg, Translator};

const AUTH_CATEGORY: &str = "UserModule.auth";

/// Wrap an HTML fragment in the plain text-only mail layout.
pub fn text_only_layout(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body>
{message}
</body>
</html>
"#
    )
}

/// Escape text for use in HTML element content and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn translate(translator: &Translator, locale: &str, message: &str, args: &[(&str, Arg<'_>)]) -> String {
    translator.translate(locale, AUTH_CATEGORY, message, args)
}

/// Content of the "new user needs approval" mail sent to managers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalEmailContent {
    pub subject: String,
    pub html: String,
}

impl ApprovalEmailContent {
    /// Render the mail for `manager` in `locale`.
    pub fn render(
        translator: &Translator,
        locale: &str,
        manager: &User,
        new_user: &User,
        approval_url: &str,
    ) -> Self {
        let manager_name = escape_html(&manager.display_name);
        let new_user_name = escape_html(&new_user.display_name);
        let approval_url = escape_html(approval_url);

        let body = format!(
            "{greeting}<br><br>\n\n{notice}<br><br>\n\n{instruction}<br>\n\n\
             <a href=\"{approval_url}\">{approval_url}</a><br/> <br/>\n",
            greeting = translate(
                translator,
                locale,
                "Hello {displayName},",
                &[("displayName", manager_name.as_str().into())]
            ),
            notice = translate(
                translator,
                locale,
                "a new user {displayName} needs approval.",
                &[("displayName", new_user_name.as_str().into())]
            ),
            instruction = translate(
                translator,
                locale,
                "Please click on the link below to view request:",
                &[]
            ),
        );

        Self {
            subject: translate(translator, locale, "New user needs approval", &[]),
            html: text_only_layout(&body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::models::user::UserStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(display_name: &str, language: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: display_name.to_lowercase(),
            email: format!("{}@example.org", display_name.to_lowercase()),
            display_name: display_name.into(),
            status: UserStatus::Enabled,
            language: language.map(Into::into),
            registration_group_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn renders_source_strings_for_default_locale() {
        let translator = Translator::embedded().unwrap();
        let content = ApprovalEmailContent::render(
            &translator,
            "en",
            &user("Maria", None),
            &user("Tom", None),
            "https://example.org/admin/approval",
        );

        assert_eq!(content.subject, "New user needs approval");
        assert!(content.html.contains("Hello Maria,<br><br>"));
        assert!(content.html.contains("a new user Tom needs approval."));
        assert!(content.html.contains(
            "<a href=\"https://example.org/admin/approval\">https://example.org/admin/approval</a>"
        ));
        assert!(content.html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn escapes_user_supplied_text() {
        let translator = Translator::embedded().unwrap();
        let content = ApprovalEmailContent::render(
            &translator,
            "en",
            &user("Maria & Co", None),
            &user("<script>alert(1)</script>", None),
            "https://example.org/admin/approval?a=1&b=\"x\"",
        );

        assert!(!content.html.contains("<script>"));
        assert!(content.html.contains("Hello Maria &amp; Co,"));
        assert!(
            content
                .html
                .contains("a new user &lt;script&gt;alert(1)&lt;/script&gt; needs approval.")
        );
        assert!(content.html.contains(
            "href=\"https://example.org/admin/approval?a=1&amp;b=&quot;x&quot;\""
        ));
    }

    #[test]
    fn escape_html_leaves_plain_text() {
        assert_eq!(escape_html("Tom"), "Tom");
        assert_eq!(escape_html("O'Neil"), "O&#39;Neil");
    }

    #[test]
    fn renders_translated_strings() {
        let translator = Translator::embedded().unwrap();
        let content = ApprovalEmailContent::render(
            &translator,
            "de",
            &user("Maria", Some("de")),
            &user("Tom", None),
            "https://example.org/admin/approval",
        );

        assert_eq!(content.subject, "Neuer Benutzer benötigt Freischaltung");
        assert!(content.html.contains("Hallo Maria,"));
        assert!(content.html.contains("Tom"));
    }
}
