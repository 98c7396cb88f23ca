use crate::biz_service::user_service::USER_NOT_FOUND;
use crate::entitys::user_entity::{OnboardingProfile, UserEntity};
use crate::manager::session_manager::SessionManager;
use crate::repository::UserRepository;
use common::errors::AppError;
use common::util::common_utils::{build_id, build_md5_with_key};
use common::util::date_util::now;
use common::util::validate::{validate_email_str, validate_password};
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_EMAIL_EXISTS: &str = "Email already exists, please use a different one";
pub const MSG_BAD_CREDENTIALS: &str = "Invalid email or password";
pub const MSG_NO_TOKEN: &str = "Unauthorized - No token provided";
pub const MSG_INVALID_TOKEN: &str = "Unauthorized - Invalid token";
pub const MSG_TOKEN_USER_GONE: &str = "Unauthorized - User not found";

const AVATAR_URL: &str = "https://avatar.iran.liara.run/public";
const AVATAR_COUNT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct SignupCommand {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Onboarding input as received; blank fields are reported back by name.
#[derive(Debug, Clone, Default)]
pub struct OnboardingCommand {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
}

/// A user together with the session token just issued for them.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: UserEntity,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
    md5_key: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionManager>, md5_key: impl Into<String>) -> Self {
        Self { users, sessions, md5_key: md5_key.into() }
    }

    pub async fn signup(&self, cmd: SignupCommand) -> Result<SignedIn, AppError> {
        let full_name = cmd.full_name.trim();
        let email = normalize_email(&cmd.email);
        if full_name.is_empty() || email.is_empty() || cmd.password.is_empty() {
            return Err(AppError::validation(MSG_FIELDS_REQUIRED));
        }
        validate_password(&cmd.password).map_err(validation_message)?;
        validate_email_str(&email).map_err(validation_message)?;

        let now = now();
        let user = UserEntity {
            id: build_id(),
            full_name: full_name.to_string(),
            email,
            password: build_md5_with_key(&cmd.password, &self.md5_key),
            profile_pic: random_avatar(),
            create_time: now,
            update_time: now,
            ..Default::default()
        };
        if !self.users.insert(&user).await? {
            warn!("signup rejected, email {} already registered", user.email);
            return Err(AppError::validation(MSG_EMAIL_EXISTS));
        }

        info!("user {} signed up", user.id);
        let token = self.sessions.create(&user.id);
        Ok(SignedIn { user, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SignedIn, AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation(MSG_FIELDS_REQUIRED));
        }
        let user = match self.users.find_by_email(&email).await? {
            Some(u) if u.password == build_md5_with_key(password, &self.md5_key) => u,
            _ => {
                warn!("failed login for {}", email);
                return Err(AppError::unauthorized(MSG_BAD_CREDENTIALS));
            }
        };
        let token = self.sessions.create(&user.id);
        Ok(SignedIn { user, token })
    }

    pub fn logout(&self, token: &str) {
        self.sessions.revoke(token);
    }

    /// Resolves a session token to its live user.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserEntity, AppError> {
        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| AppError::unauthorized(MSG_NO_TOKEN))?;
        let user_id = self.sessions.resolve(token).ok_or_else(|| AppError::unauthorized(MSG_INVALID_TOKEN))?;
        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(user),
            None => {
                self.sessions.revoke(token);
                Err(AppError::unauthorized(MSG_TOKEN_USER_GONE))
            }
        }
    }

    pub async fn onboard(&self, user_id: &str, cmd: OnboardingCommand) -> Result<UserEntity, AppError> {
        let mut missing = Vec::new();
        let mut take = |name: &str, value: Option<String>| -> String {
            let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
            if value.is_empty() {
                missing.push(name.to_string());
            }
            value
        };
        let profile = OnboardingProfile {
            full_name: take("fullName", cmd.full_name),
            bio: take("bio", cmd.bio),
            native_language: take("nativeLanguage", cmd.native_language),
            learning_language: take("learningLanguage", cmd.learning_language),
            location: take("location", cmd.location),
            profile_pic: cmd.profile_pic.filter(|p| !p.trim().is_empty()),
        };
        if !missing.is_empty() {
            return Err(AppError::InvalidFields { message: MSG_FIELDS_REQUIRED.to_string(), fields: missing });
        }

        let user = self.users.complete_onboarding(user_id, &profile).await?.ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        info!("user {} onboarded", user_id);
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validation_message(err: validator::ValidationError) -> AppError {
    AppError::Validation(err.message.map(|m| m.to_string()).unwrap_or_else(|| err.code.to_string()))
}

fn random_avatar() -> String {
    let idx = rand::rng().random_range(1..=AVATAR_COUNT);
    format!("{AVATAR_URL}/{idx}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use std::time::Duration;

    fn service() -> AuthService {
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(60)));
        AuthService::new(Arc::new(MemoryStore::new()), sessions, "pepper")
    }

    fn signup_cmd(email: &str) -> SignupCommand {
        SignupCommand { full_name: "Ana Lima".into(), email: email.into(), password: "secret1".into() }
    }

    fn onboarding() -> OnboardingCommand {
        OnboardingCommand {
            full_name: Some("Ana Lima".into()),
            bio: Some("hi".into()),
            native_language: Some("portuguese".into()),
            learning_language: Some("english".into()),
            location: Some("Lisbon".into()),
            profile_pic: None,
        }
    }

    #[tokio::test]
    async fn signup_creates_session_and_hides_password() {
        let auth = service();
        let signed = auth.signup(signup_cmd(" Ana@Example.com ")).await.unwrap();
        assert_eq!(signed.user.email, "ana@example.com");
        assert_ne!(signed.user.password, "secret1");
        assert!(!signed.user.is_onboarded);
        assert!(signed.user.profile_pic.starts_with(AVATAR_URL));

        let me = auth.authenticate(Some(&signed.token)).await.unwrap();
        assert_eq!(me.id, signed.user.id);
    }

    #[tokio::test]
    async fn signup_validates_input_in_order() {
        let auth = service();
        let missing = auth.signup(SignupCommand { password: "x".into(), ..Default::default() }).await.unwrap_err();
        assert_eq!(missing.to_string(), MSG_FIELDS_REQUIRED);

        let short = auth.signup(SignupCommand { password: "12345".into(), ..signup_cmd("not-an-email") }).await.unwrap_err();
        assert_eq!(short.to_string(), "Password must be at least 6 characters");

        let email = auth.signup(signup_cmd("not-an-email")).await.unwrap_err();
        assert_eq!(email.to_string(), "Invalid email format");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.signup(signup_cmd("ana@example.com")).await.unwrap();
        let err = auth.signup(signup_cmd("ANA@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), MSG_EMAIL_EXISTS);
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let auth = service();
        auth.signup(signup_cmd("ana@example.com")).await.unwrap();

        assert!(auth.login("ana@example.com", "secret1").await.is_ok());
        let wrong = auth.login("ana@example.com", "secret2").await.unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized(_)));
        assert_eq!(wrong.to_string(), MSG_BAD_CREDENTIALS);
        let unknown = auth.login("bob@example.com", "secret1").await.unwrap_err();
        assert_eq!(unknown.to_string(), MSG_BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn logout_invalidates_token() {
        let auth = service();
        let signed = auth.signup(signup_cmd("ana@example.com")).await.unwrap();
        auth.logout(&signed.token);
        let err = auth.authenticate(Some(&signed.token)).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_INVALID_TOKEN);
        let err = auth.authenticate(None).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_NO_TOKEN);
    }

    #[tokio::test]
    async fn token_of_vanished_user_is_rejected_and_revoked() {
        let sessions = Arc::new(SessionManager::new(Duration::from_secs(60)));
        let auth = AuthService::new(Arc::new(MemoryStore::new()), sessions.clone(), "pepper");
        let token = sessions.create("deleted-user");

        let err = auth.authenticate(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.to_string(), MSG_TOKEN_USER_GONE);

        assert!(sessions.resolve(&token).is_none());
        let err = auth.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_INVALID_TOKEN);
    }

    #[tokio::test]
    async fn onboarding_reports_missing_fields() {
        let auth = service();
        let signed = auth.signup(signup_cmd("ana@example.com")).await.unwrap();
        let cmd = OnboardingCommand { bio: None, location: Some("  ".into()), ..onboarding() };
        match auth.onboard(&signed.user.id, cmd).await.unwrap_err() {
            AppError::InvalidFields { message, fields } => {
                assert_eq!(message, MSG_FIELDS_REQUIRED);
                assert_eq!(fields, vec!["bio".to_string(), "location".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn onboarding_fills_profile_and_keeps_avatar() {
        let auth = service();
        let signed = auth.signup(signup_cmd("ana@example.com")).await.unwrap();
        let user = auth.onboard(&signed.user.id, onboarding()).await.unwrap();
        assert!(user.is_onboarded);
        assert_eq!(user.native_language, "portuguese");
        assert_eq!(user.profile_pic, signed.user.profile_pic);

        let err = auth.onboard("ghost", onboarding()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
