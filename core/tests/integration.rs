//! Full list/create/toggle/delete lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use todo_core::{ApiError, CreateTodo, HttpMethod, HttpResponse, TodoClient, UpdateTodo};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: todo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
        (HttpMethod::Patch, Some(body)) => {
            agent.patch(&req.url).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Patch, None) => agent.patch(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the mock server on its own runtime thread and return its base URL.
fn spawn_server() -> String {
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

#[test]
fn todo_lifecycle() {
    let client = TodoClient::new(&spawn_server());

    // Step 1: list is empty.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create a todo.
    let req = client.build_create_todo(&CreateTodo::new("Buy milk").unwrap()).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    let id = created.id;

    // Step 3: list returns the created todo unchanged.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(todos, vec![created.clone()]);

    // Step 4: toggle completed, twice; the second toggle is a no-op.
    for _ in 0..2 {
        let req = client.build_update_todo(id, &UpdateTodo { completed: true }).unwrap();
        let updated = client.parse_update_todo(execute(req)).unwrap();
        assert_eq!(updated.title, "Buy milk");
        assert!(updated.completed);
    }
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos[0].completed);

    // Step 5: delete.
    client.parse_delete_todo(execute(client.build_delete_todo(id))).unwrap();

    // Step 6: second delete is a plain HTTP error, no special variant.
    let err = client
        .parse_delete_todo(execute(client.build_delete_todo(id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));

    // Step 7: toggling a deleted todo fails the same way.
    let req = client.build_update_todo(id, &UpdateTodo { completed: false }).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }));

    // Step 8: list is empty again.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list after delete");
}

#[test]
fn ids_are_never_reused() {
    let client = TodoClient::new(&spawn_server());

    let req = client.build_create_todo(&CreateTodo::new("first").unwrap()).unwrap();
    let first = client.parse_create_todo(execute(req)).unwrap();
    client.parse_delete_todo(execute(client.build_delete_todo(first.id))).unwrap();

    let req = client.build_create_todo(&CreateTodo::new("second").unwrap()).unwrap();
    let second = client.parse_create_todo(execute(req)).unwrap();
    assert!(second.id > first.id);

    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.iter().all(|t| t.id != first.id));
}
