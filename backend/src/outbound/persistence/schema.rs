//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` carries a unique index; the store is the final arbiter of
    /// username uniqueness under concurrent registrations.
    users (id) {
        id -> Uuid,
        username -> Text,
        name -> Nullable<Text>,
        /// PHC-formatted Argon2id digest.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog entries, each owned by exactly one user.
    blogs (id) {
        id -> Uuid,
        title -> Text,
        author -> Nullable<Text>,
        url -> Text,
        /// Non-negative, enforced by a check constraint.
        likes -> Int4,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blogs -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(blogs, users);
