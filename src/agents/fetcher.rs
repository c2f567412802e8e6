use crate::objects::{
    DownloadAck, DownloadRequest, ErrorBody, FetchError, FetchInfoRequest, JobHandle,
    ProgressSnapshot, VideoInfo,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use yew_agent::{Agent, AgentLink, Context, HandlerId};

/// Calls against the download service. The url field is the endpoint; the id or job
/// handle is echoed back in the response.
#[derive(Debug)]
pub enum Request {
    FetchInfo(Uuid, String, FetchInfoRequest),
    Download(Uuid, String, DownloadRequest),
    Progress(String, JobHandle),
}

#[derive(Debug)]
pub enum Response {
    Info(Uuid, Result<VideoInfo, FetchError>),
    Download(Uuid, Result<DownloadAck, FetchError>),
    Progress(JobHandle, Result<ProgressSnapshot, FetchError>),
}

#[derive(Debug)]
pub enum Message {
    ReceiveInfo(HandlerId, Uuid, Result<VideoInfo, FetchError>),
    ReceiveDownload(HandlerId, Uuid, Result<DownloadAck, FetchError>),
    ReceiveProgress(HandlerId, JobHandle, Result<ProgressSnapshot, FetchError>),
}

pub struct Fetcher {
    link: AgentLink<Self>,
    subscribers: HashSet<HandlerId>,
}

enum HttpMethod {
    Get,
    Post,
}

impl Agent for Fetcher {
    type Reach = Context<Self>;
    type Message = Message;
    type Input = Request;
    type Output = Response;

    fn create(link: AgentLink<Self>) -> Self {
        Self {
            link,
            subscribers: HashSet::<HandlerId>::new(),
        }
    }

    fn update(&mut self, msg: Self::Message) {
        match msg {
            Message::ReceiveInfo(handler_id, request_id, res) => {
                self.link.respond(handler_id, Response::Info(request_id, res));
            }
            Message::ReceiveDownload(handler_id, request_id, res) => {
                self.link
                    .respond(handler_id, Response::Download(request_id, res));
            }
            Message::ReceiveProgress(handler_id, job, res) => {
                self.link.respond(handler_id, Response::Progress(job, res));
            }
        }
    }

    fn handle_input(&mut self, msg: Self::Input, id: HandlerId) {
        match msg {
            Request::FetchInfo(request_id, url, body) => {
                log::debug!("fetcher: requesting info for {} ({})", body.url, request_id);
                self.link.send_future(async move {
                    Message::ReceiveInfo(
                        id,
                        request_id,
                        fetch_deserializable(&url, HttpMethod::Post, Some(&body)).await,
                    )
                });
            }
            Request::Download(request_id, url, body) => {
                log::debug!("fetcher: submitting download of {} ({})", body.url, request_id);
                self.link.send_future(async move {
                    Message::ReceiveDownload(
                        id,
                        request_id,
                        fetch_deserializable(&url, HttpMethod::Post, Some(&body)).await,
                    )
                });
            }
            Request::Progress(url, job) => {
                self.link.send_future(async move {
                    let res =
                        fetch_deserializable::<ProgressSnapshot, ()>(&url, HttpMethod::Get, None)
                            .await;

                    Message::ReceiveProgress(id, job, res)
                });
            }
        }
    }

    fn connected(&mut self, id: HandlerId) {
        self.subscribers.insert(id);
    }

    fn disconnected(&mut self, id: HandlerId) {
        self.subscribers.remove(&id);
    }
}

async fn fetch<B: Serialize>(
    url: &str,
    method: HttpMethod,
    body: Option<&B>,
) -> Result<web_sys::Response, FetchError> {
    let mut opts = web_sys::RequestInit::new();

    match method {
        HttpMethod::Get => opts.method("GET"),
        HttpMethod::Post => opts.method("POST"),
    };

    if let Some(val) = body {
        let payload = serde_json::to_string(val)
            .map_err(|e| FetchError::Transport(format!("could not encode request: {}", e)))?;
        let headers = web_sys::Headers::new()?;

        headers.append("Content-Type", "application/json")?;
        opts.headers(&headers);
        opts.body(Some(&JsValue::from_str(&payload)));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &opts)?;
    let window = web_sys::window().ok_or(FetchError::Transport("error getting window".into()))?;
    let resp: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;

    match resp.ok() {
        true => Ok(resp),
        false => {
            let error_body = read_json::<ErrorBody>(&resp).await.ok();

            Err(FetchError::from_status(resp.status(), error_body))
        }
    }
}

async fn read_json<T: DeserializeOwned>(resp: &web_sys::Response) -> Result<T, FetchError> {
    let val = JsFuture::from(resp.json()?)
        .await
        .map_err(|e| FetchError::Decode(format!("{:?}", e)))?;

    Ok(serde_wasm_bindgen::from_value(val)?)
}

async fn fetch_deserializable<T: DeserializeOwned, B: Serialize>(
    url: &str,
    method: HttpMethod,
    body: Option<&B>,
) -> Result<T, FetchError> {
    read_json(&fetch(url, method, body).await?).await
}
