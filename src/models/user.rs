use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::record! {
    /// An account that owns events
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct User in "users" {
        pub id: i64 => "id" as "id" [identifier],
        pub email: String => "email" as "email",
        pub password: String => "password" as "password",
        pub created_at: DateTime<Utc> => "createdAt" as "created_at" [read_only],
    }
}
