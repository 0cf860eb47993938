//! Diesel schema for mirrored users.

diesel::table! {
    /// Users mirrored from the identity provider.
    users (id) {
        /// External subject identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Email address.
        #[max_length = 320]
        email -> Varchar,
        /// Optional avatar URL.
        image_url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
