//! Identity directory helpers: recipient search, recipient resolution and
//! sample addresses.

use crate::model::value::Identity;

/// Shown for recipient-like fields when the directory has nothing to offer.
pub const FALLBACK_RECIPIENTS: &str = "user1@example.com, user2@example.com, user3@example.com";

/// Most candidates a recipient search offers.
pub const SEARCH_LIMIT: usize = 10;

/// Subscribed identities when there are any, otherwise the whole directory.
pub fn preferred(identities: &[Identity]) -> Vec<&Identity> {
    let subscribed: Vec<&Identity> = identities.iter().filter(|i| i.subscribed).collect();
    if subscribed.is_empty() {
        identities.iter().collect()
    } else {
        subscribed
    }
}

/// Case-insensitive substring search over display name and email.
pub fn search<'a>(identities: &'a [Identity], query: &str) -> Vec<&'a Identity> {
    let needle = query.trim().to_lowercase();
    identities
        .iter()
        .filter(|identity| {
            needle.is_empty()
                || identity.display_name.to_lowercase().contains(&needle)
                || identity.email.to_lowercase().contains(&needle)
        })
        .take(SEARCH_LIMIT)
        .collect()
}

/// `count` sample addresses from the directory, comma separated.
pub fn sample_emails(identities: &[Identity], count: usize) -> String {
    let sample: Vec<String> = preferred(identities)
        .into_iter()
        .take(count)
        .map(Identity::display_email)
        .collect();
    if sample.is_empty() {
        FALLBACK_RECIPIENTS.to_string()
    } else {
        sample.join(", ")
    }
}

/// Turns a raw recipient value into display addresses.
///
/// Values that already hold an address are shown as they are. Otherwise each
/// token is looked up in the directory; long unknown tokens (record ids) get a
/// synthetic address built from their tail.
pub fn resolve_recipients(raw: &str, identities: &[Identity]) -> String {
    if raw.contains('@') {
        return raw.to_string();
    }
    raw.split([',', ';', ' ', '\t', '\n'])
        .filter(|token| !token.is_empty())
        .map(|token| resolve_token(token, identities))
        .collect::<Vec<_>>()
        .join(", ")
}

fn resolve_token(token: &str, identities: &[Identity]) -> String {
    if let Some(identity) = identities.iter().find(|i| i.matches_token(token)) {
        return identity.display_email();
    }
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 10 {
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("user-{}@example.com", tail)
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(id: &str, name: &str, email: &str, subscribed: bool) -> Identity {
        Identity {
            id: id.into(),
            alt_id: None,
            display_name: name.into(),
            email: email.into(),
            subscribed,
        }
    }

    fn directory() -> Vec<Identity> {
        vec![
            identity("blt01", "Ada Lovelace", "ada@analytical.org", false),
            identity("blt02", "Grace Hopper", "grace@navy.mil", true),
            identity("blt03", "Alan Turing", "", true),
        ]
    }

    #[test]
    fn empty_directory_samples_the_fallback() {
        assert_eq!(sample_emails(&[], 2), FALLBACK_RECIPIENTS);
    }

    #[test]
    fn samples_prefer_subscribed_identities() {
        assert_eq!(
            sample_emails(&directory(), 2),
            "grace@navy.mil, alan@example.com"
        );
        assert_eq!(sample_emails(&directory(), 1), "grace@navy.mil");
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let directory = directory();
        let names: Vec<&str> = search(&directory, "NAVY")
            .into_iter()
            .map(|i| i.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Grace Hopper"]);
        assert_eq!(search(&directory, "a").len(), 3);
    }

    #[test]
    fn search_is_capped() {
        let many: Vec<Identity> = (0..25)
            .map(|n| identity(&format!("id{n}"), &format!("User {n}"), "", false))
            .collect();
        assert_eq!(search(&many, "user").len(), SEARCH_LIMIT);
    }

    #[test]
    fn resolution_substitutes_known_and_synthesizes_long_tokens() {
        assert_eq!(
            resolve_recipients("blt01; blt03 bltabcdef123456 short", &directory()),
            "ada@analytical.org, alan@example.com, user-123456@example.com, short"
        );
    }

    #[test]
    fn addresses_pass_through_untouched() {
        assert_eq!(
            resolve_recipients("a@b.com;blt01", &directory()),
            "a@b.com;blt01"
        );
    }
}
