use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>ezzTracker</title></head>
<body>
<h1>ezzTracker</h1>
<p><a href="/admin/">Go to the admin</a></p>
</body>
</html>
"#;

/// Static landing page
pub async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
