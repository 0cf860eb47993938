//! Diesel schema for teams.

diesel::table! {
    /// Teams owning tasks.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Archived flag.
        archived -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Team membership links.
    team_members (team_id, user_id) {
        /// Team.
        team_id -> Uuid,
        /// Member user.
        #[max_length = 255]
        user_id -> Varchar,
    }
}

diesel::table! {
    /// Team tag links.
    team_tags (team_id, tag_name) {
        /// Team.
        team_id -> Uuid,
        /// Tag name.
        #[max_length = 50]
        tag_name -> Varchar,
    }
}

diesel::joinable!(team_members -> teams (team_id));
diesel::joinable!(team_tags -> teams (team_id));

diesel::allow_tables_to_appear_in_same_query!(teams, team_members, team_tags);
