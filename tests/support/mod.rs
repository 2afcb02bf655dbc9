//! Shared fixtures: the `/info` + `/excluded` application and request helpers.

#![allow(dead_code)]

use std::convert::Infallible;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use hyper::body::Body;
use http_body_util::{BodyExt, Full};
use tsu_request_id::context;

/// `/info` and `/excluded` answer with a small JSON body; the `x-seen-id`
/// header reports what the handler saw in the request context.
pub fn respond(path: &str) -> Response<Full<Bytes>> {
    let body: &'static [u8] = match path {
        "/info" => br#"{"message":"info"}"#,
        "/excluded" => br#"{"message":"excluded"}"#,
        _ => {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::new()))
                .unwrap();
        }
    };

    Response::builder()
        .header("content-type", "application/json")
        .header("x-seen-id", context::get(""))
        .body(Full::new(Bytes::from_static(body)))
        .unwrap()
}

pub async fn app(req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, Infallible> {
    tokio::task::yield_now().await;
    Ok(respond(req.uri().path()))
}

pub async fn incoming_app(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    tokio::task::yield_now().await;
    Ok(respond(req.uri().path()))
}

pub fn get(path: &str) -> Request<Full<Bytes>> {
    get_with(path, &[])
}

pub fn get_with(path: &str, headers: &[(&str, &str)]) -> Request<Full<Bytes>> {
    let mut builder = Request::get(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

pub fn header<'a, B>(res: &'a Response<B>, name: &str) -> Option<&'a str> {
    res.headers().get(name).map(|v| v.to_str().unwrap())
}

pub async fn body_string<B>(res: Response<B>) -> String
where
    B: Body,
    B::Error: std::fmt::Debug,
{
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn is_uuid_v4(s: &str) -> bool {
    uuid::Uuid::parse_str(s).is_ok_and(|u| u.get_version_num() == 4)
}
