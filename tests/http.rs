use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use tinywiki::{build_router, AppState, Page, PageStore, TemplateSet};

const VIEW: &str = "<h1>{{.Title}}</h1><div>{{.HTMLBody}}</div>";
const EDIT: &str = "<h1>Editing {{.Title}}</h1><textarea name=\"body\">{{.Body}}</textarea>";

struct Wiki {
    dir: TempDir,
    store: PageStore,
    app: Router,
}

fn wiki_with(templates: TemplateSet) -> Wiki {
    let dir = TempDir::new().unwrap();
    let store = PageStore::new(dir.path().join("data"));
    let app = build_router(AppState::new(store.clone(), templates));
    Wiki { dir, store, app }
}

fn wiki() -> Wiki {
    wiki_with(TemplateSet::from_sources([("view", VIEW), ("edit", EDIT)]).unwrap())
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, content_type: &str, payload: &str) -> Response {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, req).await
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    post(app, uri, "application/x-www-form-urlencoded", form).await
}

async fn text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn root_redirects_to_front_page() {
    let w = wiki();
    for method in [Method::GET, Method::POST, Method::DELETE] {
        let req = Request::builder().method(method).uri("/").body(Body::empty()).unwrap();
        let resp = send(&w.app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/view/FrontPage");
    }
}

#[tokio::test]
async fn viewing_missing_page_redirects_to_edit() {
    let w = wiki();
    let resp = get(&w.app, "/view/NewPage").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/edit/NewPage");
}

#[tokio::test]
async fn editing_missing_page_shows_blank_form() {
    let w = wiki();
    let resp = get(&w.app, "/edit/NewPage").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        text(resp).await,
        "<h1>Editing NewPage</h1><textarea name=\"body\"></textarea>"
    );
}

#[tokio::test]
async fn save_then_view_renders_links() {
    let w = wiki();
    let resp = post_form(&w.app, "/save/Home", "body=See+%5BFrontPage%5D+and+%5BBar2%5D").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Home");

    let saved = w.store.load("Home").await.unwrap();
    assert_eq!(saved, Page::with_body("Home", "See [FrontPage] and [Bar2]"));

    let resp = get(&w.app, "/view/Home").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        text(resp).await,
        "<h1>Home</h1><div>See <a href='/view/FrontPage'>FrontPage</a> and \
         <a href='/view/Bar2'>Bar2</a></div>"
    );
}

#[tokio::test]
async fn edit_shows_raw_escaped_source() {
    let w = wiki();
    w.store.save(&Page::with_body("Src", "<i>[Other]</i>")).await.unwrap();

    let resp = get(&w.app, "/edit/Src").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        text(resp).await,
        "<h1>Editing Src</h1><textarea name=\"body\">&lt;i&gt;[Other]&lt;/i&gt;</textarea>"
    );
}

#[tokio::test]
async fn view_passes_author_markup_through() {
    let w = wiki();
    w.store.save(&Page::with_body("Styled", "<b>bold</b> [Other]")).await.unwrap();

    let body = text(get(&w.app, "/view/Styled").await).await;
    assert_eq!(body, "<h1>Styled</h1><div><b>bold</b> <a href='/view/Other'>Other</a></div>");
}

#[tokio::test]
async fn empty_save_creates_viewable_page() {
    let w = wiki();
    let resp = post_form(&w.app, "/save/Empty", "body=").await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let resp = get(&w.app, "/view/Empty").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(text(resp).await, "<h1>Empty</h1><div></div>");
}

#[tokio::test]
async fn save_without_body_field_stores_empty_page() {
    let w = wiki();
    let resp = get(&w.app, "/save/Bare").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Bare");
    assert!(w.store.load("Bare").await.unwrap().body.is_empty());
}

#[tokio::test]
async fn save_accepts_multipart_form() {
    let w = wiki();
    w.store.save(&Page::with_body("Home", "precious")).await.unwrap();

    let payload = "--XX\r\nContent-Disposition: form-data; name=\"body\"\r\n\r\nnew text\r\n--XX--\r\n";
    let resp = post(&w.app, "/save/Home", "multipart/form-data; boundary=XX", payload).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Home");
    assert_eq!(w.store.load("Home").await.unwrap().body, b"new text");
}

#[tokio::test]
async fn unreadable_form_leaves_page_untouched() {
    let w = wiki();
    w.store.save(&Page::with_body("Home", "precious")).await.unwrap();

    let resp = post(&w.app, "/save/Home", "multipart/form-data", "body=x").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(w.store.load("Home").await.unwrap().body, b"precious");
}

#[tokio::test]
async fn posted_form_without_body_falls_back_to_query() {
    let w = wiki();
    let resp = post_form(&w.app, "/save/Mixed?body=from+query", "title=ignored").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(w.store.load("Mixed").await.unwrap().body, b"from query");
}

#[tokio::test]
async fn percent_encoded_title_is_decoded_before_matching() {
    let w = wiki();
    w.store.save(&Page::with_body("FooBar", "found me")).await.unwrap();

    let resp = get(&w.app, "/view/Foo%42ar").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(text(resp).await, "<h1>FooBar</h1><div>found me</div>");
}

#[tokio::test]
async fn save_accepts_query_string_form() {
    let w = wiki();
    let resp = get(&w.app, "/save/Query?body=hello%20there").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(w.store.load("Query").await.unwrap().body, b"hello there");
}

#[tokio::test]
async fn invalid_paths_are_404_without_touching_storage() {
    let w = wiki();
    for uri in [
        "/nothing",
        "/view",
        "/view/",
        "/view/Bad_Title",
        "/view/a/b",
        "/edit/..%2Fsecret",
        "/save/has.dot",
        "/save/",
        "/delete/Foo",
        "/favicon.ico",
    ] {
        let resp = post_form(&w.app, uri, "body=pwned").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(text(resp).await, "404 page not found");
    }
    assert!(!w.store.root().exists());
}

#[tokio::test]
async fn storage_failure_is_500_with_error_text() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, b"a file where the directory should be").unwrap();
    let templates = TemplateSet::from_sources([("view", VIEW), ("edit", EDIT)]).unwrap();
    let app = build_router(AppState::new(PageStore::new(blocker), templates));

    let resp = post_form(&app, "/save/Doomed", "body=x").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(resp).await.starts_with("I/O error: "));
}

#[tokio::test]
async fn missing_template_is_500_with_error_text() {
    let w = wiki_with(TemplateSet::from_sources([("edit", EDIT)]).unwrap());
    w.store.save(&Page::with_body("Home", "hi")).await.unwrap();

    let resp = get(&w.app, "/view/Home").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(resp).await, "Template error: template view.html is not loaded");
}

#[tokio::test]
async fn concurrent_saves_keep_one_submission() {
    let w = wiki();
    let first = format!("body={}", "a".repeat(20_000));
    let second = "body=b".to_string();

    let (r1, r2) = tokio::join!(
        post_form(&w.app, "/save/Race", &first),
        post_form(&w.app, "/save/Race", &second),
    );
    assert_eq!(r1.status(), StatusCode::FOUND);
    assert_eq!(r2.status(), StatusCode::FOUND);

    let body = w.store.load("Race").await.unwrap().body;
    assert!(body == "a".repeat(20_000).into_bytes() || body == b"b");
    assert!(w.dir.path().join("data").join("Race.txt").is_file());
}
