use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;

/// `GET /login`
///
/// Messages from a failed `POST /login` (or a logout) arrive as flash cookies.
pub async fn login_form(flash_messages: IncomingFlashMessages) -> HttpResponse {
    let mut msg_html = String::new();
    for msg in flash_messages.iter() {
        msg_html.push_str(&format!(
            "<p><i>{}</i></p>\n",
            htmlescape::encode_minimal(msg.content())
        ));
    }

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Login</title>
  </head>
  <body>
    {msg_html}
    <!-- POST, otherwise credentials end up in the url -->
    <form action="/login" method="post">
      <label>
        Username
        <input type="text" placeholder="Enter Username" name="username" />
      </label>
      <label>
        Password
        <input type="password" placeholder="Enter Password" name="password" />
      </label>
      <button type="submit">Login</button>
    </form>
  </body>
</html>"#,
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
