//! Full sync lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives a real `Session`
//! over HTTP using a ureq-backed transport: registration, token exchange,
//! authenticated creates, the REST/GraphQL convergence check, and the
//! optimistic deletes with their server-side cascade.

use sync_core::{
    normalize, ApiClient, CreateProject, CreateTodo, CreateUser, DataSource, GraphqlSource,
    HttpMethod, HttpRequest, HttpResponse, MemoryStorage, NoticeLevel, RestSource, Session,
    TokenStorage, Transport, TransportError,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data rather than `Err`, leaving status
/// interpretation to the client's parse methods.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            (HttpMethod::Delete, _) => {
                let mut builder = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            (HttpMethod::Post, Some(body)) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.send_empty()
            }
        };

        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn registration(username: &str, password: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password: password.to_string(),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        middle_name: String::new(),
        email: format!("{username}@example.com"),
        birthdate: None,
    }
}

#[test]
fn sync_lifecycle() {
    let base_url = start_server();
    let client = ApiClient::new(&base_url);
    let mut session = Session::new(client.clone(), UreqTransport::new(), MemoryStorage::new());

    // Step 1: anonymous start — GraphQL path, empty backend.
    session.start();
    assert!(session.store().snapshot().users.is_empty());
    assert!(!session.store().auth().is_authenticated());

    // Step 2: open registration, reconciled by refetch.
    session.create_user(&registration("ada", "pw"));
    assert_eq!(session.store().notice().unwrap().level, NoticeLevel::Info);
    session.create_user(&registration("grace", "pw2"));
    assert_eq!(session.store().snapshot().users.len(), 2);

    // Step 3: bad credentials leave everything untouched.
    session.authenticate("ada", "wrong");
    assert!(!session.store().auth().is_authenticated());
    assert!(session.storage().load().is_none());
    assert_eq!(
        session.store().notice().unwrap().text,
        "Invalid login or password"
    );

    // Step 4: sign in, switching the fetch path to REST.
    session.authenticate("ada", "pw");
    assert!(session.store().auth().is_authenticated());
    let stored = session.storage().load().unwrap();
    assert_eq!(stored.login, "ada");
    assert_eq!(session.store().snapshot().users.len(), 2);

    // Step 5: create a shared project and a todo in it.
    session.create_project(&CreateProject {
        name: "Engine".to_string(),
        repository: format!("{base_url}/engine"),
        users: vec![1, 2],
    });
    assert_eq!(session.store().snapshot().projects.len(), 1);
    let project_id = session.store().snapshot().projects[0].id;
    assert_eq!(session.store().snapshot().projects[0].users, vec![1, 2]);

    session.create_todo(&CreateTodo {
        project: project_id,
        user: 1,
        text: "Write notes".to_string(),
    });
    assert_eq!(session.store().snapshot().todos.len(), 1);
    let todo = &session.store().snapshot().todos[0];
    assert_eq!(todo.project, project_id);
    assert_eq!(todo.user, 1);

    // Step 6: both paths converge to the same normalized snapshot.
    let transport = UreqTransport::new();
    let token = session.store().auth().token().unwrap().to_string();
    let via_rest = normalize(
        RestSource { token: &token }
            .fetch_all(&client, &transport)
            .unwrap(),
    );
    let via_graphql = normalize(GraphqlSource.fetch_all(&client, &transport).unwrap());
    assert_eq!(via_rest, via_graphql);

    // Step 7: optimistic todo delete, confirmed by the next fetch.
    let todo_id = session.store().snapshot().todos[0].id;
    session.delete_todo(todo_id);
    assert!(session.store().snapshot().todos.is_empty());
    session.fetch_all();
    assert!(session.store().snapshot().todos.is_empty());

    // Step 8: project delete cascades on both sides.
    session.create_todo(&CreateTodo {
        project: project_id,
        user: 2,
        text: "Another note".to_string(),
    });
    assert_eq!(session.store().snapshot().todos.len(), 1);
    session.delete_project(project_id);
    assert!(session.store().snapshot().projects.is_empty());
    assert!(session.store().snapshot().todos.is_empty());
    session.fetch_all();
    assert!(session.store().snapshot().projects.is_empty());
    assert!(session.store().snapshot().todos.is_empty());

    // Step 9: sign out drops back to the anonymous path with data intact.
    session.deauthenticate();
    assert!(!session.store().auth().is_authenticated());
    assert!(session.storage().load().is_none());
    assert_eq!(session.store().snapshot().users.len(), 2);
}
