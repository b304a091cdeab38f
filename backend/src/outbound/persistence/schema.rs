//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate with `diesel print-schema` when the schema changes.

diesel::table! {
    /// Employee records. `email` carries a unique constraint and `age` a
    /// CHECK constraint of 16..=100.
    employees (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        age -> Nullable<Int4>,
        department -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Client accounts. `password_hash` holds an Argon2 PHC string.
    clients (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(employees, clients);
