// Tables written by the sample data generator. The schema itself is owned by
// the application's migrations.

diesel::table! {
    active_user_records (id) {
        id -> Text,
        user_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    teams (id) {
        id -> Text,
        name -> Text,
        timezone -> Nullable<Text>,
        created_at -> Timestamptz,
        organization_id -> Nullable<Text>,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        team_id -> Text,
        email -> Nullable<Text>,
    }
}

diesel::joinable!(active_user_records -> users (user_id));
diesel::joinable!(users -> teams (team_id));

diesel::allow_tables_to_appear_in_same_query!(active_user_records, teams, users,);
