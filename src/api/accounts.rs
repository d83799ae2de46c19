use crate::api::client::{execute, execute_json, ApiClient};
use crate::auth::{Session, SessionStore, Token};
use crate::types::{
    AppError, LoginRequest, LoginResponse, Profile, RegisterRequest, Result, Role,
};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, info};

const LOGIN_PATH: &str = "/api/login/";
const REGISTER_PATH: &str = "/api/register/";
const LOGOUT_PATH: &str = "/api/logout/";

impl ApiClient {
    /// `POST /api/login/`, validated into a [`Session`].
    ///
    /// Blank credentials are rejected before any request is made. A reply
    /// missing a token or carrying an unknown role is an authentication error.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Username and password are required.".to_string(),
            ));
        }

        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let req = self.request(Method::POST, LOGIN_PATH, None).json(&body);
        let reply: LoginResponse = execute_json(req).await?;

        let (access, refresh, role) = match (reply.access, reply.refresh, reply.role) {
            (Some(access), Some(refresh), Some(role))
                if !access.is_empty() && !refresh.is_empty() && !role.is_empty() =>
            {
                (access, refresh, role)
            }
            _ => {
                return Err(AppError::Auth(
                    "Login failed: Missing token or role from server.".to_string(),
                ))
            }
        };
        let role: Role = role.parse()?;

        debug!(%role, "Login succeeded");
        Ok(Session::new(Token::new(access), Token::new(refresh), role))
    }

    /// [`login`](Self::login) and persist the session in `store`.
    pub async fn login_and_store(
        &self,
        store: &dyn SessionStore,
        username: &str,
        password: &str,
    ) -> Result<Role> {
        let session = self.login(username, password).await?;
        store.save(&session)?;
        let role = session
            .role
            .ok_or_else(|| AppError::Auth("Login failed: Missing token or role from server.".to_string()))?;
        info!(%role, "Session stored");
        Ok(role)
    }

    /// `POST /api/register/`.
    ///
    /// Candidates register with a multipart form so a CV file can be attached;
    /// the other roles send JSON.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        let req = self.request(Method::POST, REGISTER_PATH, None);
        let req = match &request.profile {
            Profile::Candidate { name, cv } => {
                let mut form = base_form(request).text("Name", name.clone());
                if let Some(path) = cv {
                    let bytes = tokio::fs::read(path).await?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "cv".to_string());
                    form = form.part("UploadedCV", Part::bytes(bytes).file_name(file_name));
                }
                req.multipart(form)
            }
            _ => req.json(&registration_json(request)),
        };

        let reply: Value = execute_json(req).await?;
        info!(username = %request.username, role = %request.profile.role(), "Registered");
        Ok(reply)
    }

    /// `POST /api/logout/`, then clear the local session.
    ///
    /// The session is kept when the server refuses the logout. Without a
    /// stored token there is nothing to end on the server.
    pub async fn logout(&self, store: &dyn SessionStore) -> Result<()> {
        if let Some(token) = store.token() {
            let req = self.request(Method::POST, LOGOUT_PATH, Some(&token));
            execute(req).await?;
        }
        store.clear()?;
        info!("Logged out");
        Ok(())
    }
}

fn base_form(request: &RegisterRequest) -> Form {
    Form::new()
        .text("username", request.username.clone())
        .text("email", request.email.clone())
        .text("password", request.password.clone())
        .text("confirm_password", request.confirm_password.clone())
        .text("role", request.profile.role().as_str())
}

fn registration_json(request: &RegisterRequest) -> Value {
    let mut body = Map::new();
    body.insert("username".into(), request.username.clone().into());
    body.insert("email".into(), request.email.clone().into());
    body.insert("password".into(), request.password.clone().into());
    body.insert("confirm_password".into(), request.confirm_password.clone().into());
    body.insert("role".into(), request.profile.role().as_str().into());

    match &request.profile {
        Profile::Hr {
            name,
            organization_name,
        } => {
            body.insert("Name".into(), name.clone().into());
            body.insert("OrganizationName".into(), organization_name.clone().into());
        }
        Profile::Employee {
            department,
            position,
            organization_name,
        } => {
            body.insert("Department".into(), department.clone().into());
            body.insert("Position".into(), position.clone().into());
            body.insert("OrganizationName".into(), organization_name.clone().into());
        }
        Profile::Candidate { name, .. } => {
            body.insert("Name".into(), name.clone().into());
        }
    }

    Value::Object(body)
}
