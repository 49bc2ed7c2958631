/// URL slug from a display name: lowercase, alphanumerics kept, whitespace
/// collapsed to single dashes, everything else dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_names() {
        assert_eq!(slugify("Home Cleaning"), "home-cleaning");
        assert_eq!(slugify("Plumbing"), "plumbing");
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(slugify("AC Repair & Maintenance!"), "ac-repair-maintenance");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(slugify("  Deep   Cleaning  "), "deep-cleaning");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
