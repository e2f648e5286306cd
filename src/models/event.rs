use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::record! {
    /// A scheduled gathering created by a user
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Event in "events" {
        pub id: i64 => "id" as "id" [identifier],
        pub user_id: i64 => "userId" as "user_id",
        pub name: String => "name" as "name",
        pub description: String => "description" as "description",
        pub start_date: DateTime<Utc> => "startDate" as "start_date",
        /// Set by storage on insert
        pub created_at: DateTime<Utc> => "createdAt" as "created_at" [read_only],
        pub max_attendees: i64 => "maxAttendees" as "max_attendees",
    }
}
