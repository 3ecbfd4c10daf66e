diesel::table! {
    signups (community_id, member_id) {
        community_id -> Int8,
        member_id -> Int8,
        account_name -> Text,
        display_name -> Text,
        role_class -> Text,
        gear_level -> Text,
        availability -> Text,
        voice_capability -> Text,
        note -> Text,
        team -> Text,
        submitted_at -> Text,
        updated_at -> Timestamptz,
    }
}
