//! Category entity
//!
//! Delete-protected from articles: the FK is RESTRICT at the schema level
//! and no delete surface exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text", unique)]
    pub name: String,

    #[sea_orm(column_type = "Text", unique)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article::Entity")]
    Articles,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Derive a URL slug from a category name when none was supplied.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true; // suppress leading dashes

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Machine Learning"), "machine-learning");
        assert_eq!(slugify("Rust"), "rust");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("C++ & Friends"), "c-friends");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn test_slugify_agrees_with_seeded_slugs() {
        for (name, slug) in [
            ("Backend", "backend"),
            ("Frontend", "frontend"),
            ("AI", "ai"),
            ("Cyber Security", "cyber-security"),
            ("Cyber Sport", "cyber-sport"),
            ("Game Development", "game-development"),
        ] {
            assert_eq!(slugify(name), slug);
        }
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
