use super::ids::{SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// The bearer token itself. Only present on the response that issued
    /// the session; listings redact it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub user_id: UserId,

    pub created: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub expires: DateTime<Utc>,

    pub os: Option<String>,
    pub platform: Option<String>,
    pub user_agent: String,
    pub ip: String,

    /// Whether this is the session the request was authenticated with.
    pub current: bool,
}

use crate::database::models::session_item::Session as DBSession;
impl Session {
    pub fn from(data: DBSession, include_session: bool, user_session: Option<&str>) -> Self {
        Session {
            id: data.id.into(),
            current: Some(&*data.session) == user_session,
            session: if include_session {
                Some(data.session)
            } else {
                None
            },
            user_id: data.user_id.into(),
            created: data.created,
            last_login: data.last_login,
            expires: data.expires,
            os: data.os,
            platform: data.platform,
            user_agent: data.user_agent,
            ip: data.ip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models as db;

    fn db_session(token: &str) -> DBSession {
        DBSession {
            id: db::SessionId(1234567890),
            session: token.to_string(),
            user_id: db::UserId(987654321),
            created: Utc::now(),
            last_login: Utc::now(),
            expires: Utc::now() + chrono::Duration::days(14),
            os: Some("Linux".to_string()),
            platform: Some("Firefox".to_string()),
            user_agent: "test agent".to_string(),
            ip: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn listing_redacts_token_and_flags_current() {
        let token = "hpy_abcdef";
        let session = Session::from(db_session(token), false, Some(token));
        assert!(session.current);
        assert!(session.session.is_none());

        let other = Session::from(db_session(token), false, Some("hpy_other"));
        assert!(!other.current);
    }

    #[test]
    fn issued_session_includes_token() {
        let session = Session::from(db_session("hpy_abcdef"), true, None);
        assert_eq!(session.session.as_deref(), Some("hpy_abcdef"));
        assert!(!session.current);
    }
}
