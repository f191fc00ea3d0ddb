//! Blog post form bodies (`application/x-www-form-urlencoded`).

use serde::Deserialize;

/// Body of `POST /blog-posts/create`.
///
/// Absent fields decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostForm {
    /// Post title.
    #[serde(default)]
    pub title: String,
    /// Post body.
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /blog-posts/delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletePostForm {
    /// Raw `postID` field; validated by [`DeletePostForm::post_id`].
    #[serde(rename = "postID", default)]
    pub raw_post_id: String,
}

impl DeletePostForm {
    /// Parses the submitted id.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `postID` is not a 32-bit integer.
    pub fn post_id(&self) -> Result<i32, std::num::ParseIntError> {
        self.raw_post_id.trim().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_parses_integers_only() {
        let form = DeletePostForm {
            raw_post_id: " 42 ".to_string(),
        };
        assert_eq!(form.post_id().ok(), Some(42));

        let form = DeletePostForm {
            raw_post_id: "42; DROP TABLE posts".to_string(),
        };
        assert!(form.post_id().is_err());
        assert!(DeletePostForm::default().post_id().is_err());
    }
}
