//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. Regenerate
//! with `diesel print-schema` whenever a migration changes the schema.

diesel::table! {
    /// Registered user accounts.
    ///
    /// `email` carries a unique index; the credential hash lives next to
    /// the profile data and is never exposed past the repository adapter.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name shown in the UI (max 50 characters).
        display_name -> Varchar,
        /// Login email, stored lowercased. Unique.
        email -> Varchar,
        /// Optional avatar URL.
        profile_pic -> Nullable<Text>,
        /// Argon2 credential hash in PHC string format.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vehicles stored per user.
    ///
    /// `(vin, user_id)` carries a unique index: the same VIN may appear in
    /// many garages but never twice in one.
    vehicles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// 17-character VIN, stored uppercased.
        vin -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Decoded attributes for a stored vehicle, one row per vehicle.
    ///
    /// Every attribute is nullable; the decoder omitting a variable is a
    /// normal outcome. `turbo` is a nullable boolean where NULL means the
    /// decoder said nothing either way.
    vehicle_details (vehicle_id) {
        /// Primary key and foreign key to `vehicles.id` (ON DELETE CASCADE).
        vehicle_id -> Uuid,
        year -> Nullable<Int4>,
        make -> Nullable<Varchar>,
        model -> Nullable<Varchar>,
        trim -> Nullable<Varchar>,
        top_speed -> Nullable<Int4>,
        cylinders -> Nullable<Varchar>,
        horsepower -> Nullable<Varchar>,
        turbo -> Nullable<Bool>,
        engine_model -> Nullable<Varchar>,
        fuel_type -> Nullable<Varchar>,
        transmission_style -> Nullable<Varchar>,
        drive_type -> Nullable<Varchar>,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(vehicles -> users (user_id));
diesel::joinable!(vehicle_details -> vehicles (vehicle_id));

diesel::allow_tables_to_appear_in_same_query!(users, vehicles, vehicle_details);
