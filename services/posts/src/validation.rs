//! Field validation for post payloads
//!
//! Lengths are counted in characters, not bytes.

use crate::models::{NewPost, PostChanges};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const AUTHOR_MIN: usize = 2;
pub const AUTHOR_MAX: usize = 100;
pub const CONTENT_MIN: usize = 10;
pub const SUBJECT_MAX: usize = 100;

/// Validate title
pub fn validate_title(title: &str) -> Result<(), String> {
    let len = title.chars().count();
    if len == 0 {
        return Err("Title is required".to_string());
    }
    if len < TITLE_MIN {
        return Err(format!("Title must be at least {} characters long", TITLE_MIN));
    }
    if len > TITLE_MAX {
        return Err(format!("Title must be at most {} characters long", TITLE_MAX));
    }
    Ok(())
}

/// Validate author
pub fn validate_author(author: &str) -> Result<(), String> {
    let len = author.chars().count();
    if len == 0 {
        return Err("Author is required".to_string());
    }
    if len < AUTHOR_MIN {
        return Err(format!(
            "Author must be at least {} characters long",
            AUTHOR_MIN
        ));
    }
    if len > AUTHOR_MAX {
        return Err(format!(
            "Author must be at most {} characters long",
            AUTHOR_MAX
        ));
    }
    Ok(())
}

/// Validate content
pub fn validate_content(content: &str) -> Result<(), String> {
    let len = content.chars().count();
    if len == 0 {
        return Err("Content is required".to_string());
    }
    if len < CONTENT_MIN {
        return Err(format!(
            "Content must be at least {} characters long",
            CONTENT_MIN
        ));
    }
    Ok(())
}

/// Validate subject
pub fn validate_subject(subject: &str) -> Result<(), String> {
    if subject.chars().count() > SUBJECT_MAX {
        return Err(format!(
            "Subject must be at most {} characters long",
            SUBJECT_MAX
        ));
    }
    Ok(())
}

/// Validate a creation payload, collecting every failing field
pub fn validate_new_post(post: &NewPost) -> Result<(), Vec<String>> {
    let errors: Vec<String> = [
        validate_title(&post.title),
        validate_author(&post.author),
        validate_content(&post.content),
        post.subject.as_deref().map_or(Ok(()), validate_subject),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate an update payload; only the fields present are checked
pub fn validate_changes(changes: &PostChanges) -> Result<(), Vec<String>> {
    let errors: Vec<String> = [
        changes.title.as_deref().map_or(Ok(()), validate_title),
        changes.author.as_deref().map_or(Ok(()), validate_author),
        changes.content.as_deref().map_or(Ok(()), validate_content),
        changes.subject.as_deref().map_or(Ok(()), validate_subject),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_post() -> NewPost {
        NewPost {
            title: "Rust".to_string(),
            content: "Ownership explained simply.".to_string(),
            author: "Ana".to_string(),
            subject: None,
            tags: None,
        }
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"a".repeat(200)).is_ok());
        assert!(validate_title(&"a".repeat(201)).is_err());
        assert_eq!(validate_title(""), Err("Title is required".to_string()));
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(validate_title("çãé").is_ok());
        assert!(validate_author("Zé").is_ok());
        assert!(validate_subject(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn test_author_content_and_subject_bounds() {
        assert!(validate_author("A").is_err());
        assert!(validate_author(&"a".repeat(101)).is_err());
        assert!(validate_content("too short").is_err());
        assert!(validate_content("long enough").is_ok());
        assert!(validate_subject("").is_ok());
        assert!(validate_subject(&"s".repeat(101)).is_err());
    }

    #[test]
    fn test_new_post_collects_all_field_errors() {
        assert!(validate_new_post(&valid_post()).is_ok());

        let errors = validate_new_post(&NewPost {
            title: "ab".to_string(),
            content: "short".to_string(),
            author: "A".to_string(),
            subject: Some("s".repeat(101)),
            tags: None,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "Title must be at least 3 characters long");
    }

    #[test]
    fn test_changes_only_check_present_fields() {
        assert!(validate_changes(&PostChanges::default()).is_ok());

        let changes = PostChanges {
            content: Some("tiny".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_changes(&changes),
            Err(vec!["Content must be at least 10 characters long".to_string()])
        );
    }
}
