use crate::{
    agents::{fetcher, notifier, poller},
    components::{
        format_select::FormatSelect, playlist_select::PlaylistSelect,
        progress_panel::ProgressPanel,
    },
    controller::ClientController,
    objects::{ClientConfig, JsError},
    utils,
};
use web_sys::{Event, InputEvent};
use yew::prelude::*;
use yew_agent::{Bridge, Bridged, Dispatched, Dispatcher};

/// The download page: URL entry, format and playlist choice, job progress.
pub struct Downloader {
    controller: ClientController,
    fetcher: Box<dyn Bridge<fetcher::Fetcher>>,
    poller: Box<dyn Bridge<poller::Poller>>,
    notifier: Dispatcher<notifier::Notifier>,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub config: ClientConfig,
}

pub enum Message {
    UrlInput(InputEvent),
    Fetch,
    Download { audio_only: bool },
    Reset,
    VideoFormatChanged(String),
    AudioFormatChanged(String),
    PlaylistItemChanged(usize, bool),
    PlaylistSelectAll(bool),
    UseThumbnailChanged(Event),
    AutoDownloadChanged(Event),
    FetcherMessage(fetcher::Response),
    PollerMessage(poller::Response),
}

impl Downloader {
    fn process_update(&mut self, ctx: &Context<Self>, msg: Message) -> Result<bool, JsError> {
        let config = &ctx.props().config;

        match msg {
            Message::UrlInput(event) => {
                let input = utils::get_input_element_from_event(&event)?;

                self.controller.set_url_input(input.value());
            }
            Message::Fetch => {
                if let Ok((request_id, request)) = self.controller.begin_fetch() {
                    self.fetcher.send(fetcher::Request::FetchInfo(
                        request_id,
                        config.fetch_info_url(),
                        request,
                    ));
                }
            }
            Message::Download { audio_only } => {
                if let Ok((request_id, request)) = self.controller.begin_download(audio_only) {
                    self.poller.send(poller::Request::Stop);
                    self.fetcher.send(fetcher::Request::Download(
                        request_id,
                        config.download_url(),
                        request,
                    ));
                }
            }
            Message::Reset => {
                if let Some(job) = self.controller.reset() {
                    log::info!("stopped following job {}", job);
                }
                self.poller.send(poller::Request::Stop);
            }
            Message::VideoFormatChanged(format_id) => {
                self.controller.select_video_format(format_id)
            }
            Message::AudioFormatChanged(format_id) => {
                self.controller.select_audio_format(format_id)
            }
            Message::PlaylistItemChanged(index, checked) => {
                self.controller.set_playlist_item(index, checked)
            }
            Message::PlaylistSelectAll(checked) => self.controller.set_all_playlist_items(checked),
            Message::UseThumbnailChanged(event) => {
                let checkbox = utils::get_input_element_from_event(&event)?;

                self.controller.set_use_thumbnail_as_cover(checkbox.checked());
            }
            Message::AutoDownloadChanged(event) => {
                let checkbox = utils::get_input_element_from_event(&event)?;

                self.controller.set_auto_download(checkbox.checked());
            }
            Message::FetcherMessage(response) => match response {
                fetcher::Response::Info(request_id, Ok(info)) => {
                    self.controller.fetch_succeeded(request_id, info)
                }
                fetcher::Response::Info(request_id, Err(e)) => {
                    self.controller.fetch_failed(request_id, &e)
                }
                fetcher::Response::Download(request_id, Ok(ack)) => {
                    if let Some(job) = self.controller.download_acknowledged(request_id, ack) {
                        self.poller.send(poller::Request::Start {
                            progress_url: config.progress_url(&job),
                            interval_ms: config.poll_interval_ms,
                            job,
                        });
                    }
                }
                fetcher::Response::Download(request_id, Err(e)) => {
                    self.controller.download_failed(request_id, &e)
                }
                fetcher::Response::Progress(_, _) => return Ok(false),
            },
            Message::PollerMessage(poller::Response::Tick(job, res)) => {
                let outcome = self.controller.poll_tick(&job, res);

                if outcome.stop_polling {
                    self.poller.send(poller::Request::Stop);
                }
                for file in outcome.auto_downloads {
                    match utils::trigger_file_download(&file.url, &file.name) {
                        Ok(()) => self
                            .controller
                            .note(format!("Automatic download of \"{}\" started.", file.name)),
                        Err(e) => self.notifier.send(notifier::Request::NotifyError(e)),
                    }
                }
            }
        }

        Ok(true)
    }

    fn view_actions(&self, ctx: &Context<Self>) -> Html {
        let controls = self.controller.controls();

        html! {
            <div class="field is-grouped is-grouped-multiline">
                <p class="control is-expanded">
                    <input class="input" type="text" placeholder="media url" value={self.controller.url_input().to_string()} oninput={ctx.link().callback(Message::UrlInput)}/>
                </p>
                <p class="control">
                    <button class="button is-link" disabled={!controls.fetch} onclick={ctx.link().callback(|_| Message::Fetch)}>{"Fetch info"}</button>
                </p>
                <p class="control">
                    <button class="button is-primary" disabled={!controls.download} onclick={ctx.link().callback(|_| Message::Download { audio_only: false })}>{"Download"}</button>
                </p>
                <p class="control">
                    <button class="button is-primary is-light" disabled={!controls.audio_only} onclick={ctx.link().callback(|_| Message::Download { audio_only: true })}>{"Audio only"}</button>
                </p>
                <p class="control">
                    <button class="button" onclick={ctx.link().callback(|_| Message::Reset)}>{"Reset"}</button>
                </p>
            </div>
        }
    }

    fn view_options(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="field is-grouped">
                <p class="control">
                    <label class="checkbox">
                        <input type="checkbox" checked={self.controller.use_thumbnail_as_cover()} onchange={ctx.link().callback(Message::UseThumbnailChanged)}/>
                        {" Use thumbnail as cover"}
                    </label>
                </p>
                <p class="control">
                    <label class="checkbox">
                        <input type="checkbox" checked={self.controller.auto_download()} onchange={ctx.link().callback(Message::AutoDownloadChanged)}/>
                        {" Download files automatically"}
                    </label>
                </p>
            </div>
        }
    }

    fn view_info(&self, ctx: &Context<Self>) -> Html {
        let info = match (self.controller.info_visible(), self.controller.video_info()) {
            (true, Some(info)) => info,
            _ => {
                return html! {
                    <p class="subtitle">{self.controller.title_text().to_string()}</p>
                }
            }
        };
        let thumbnail = info.thumbnail_url.clone().unwrap_or_else(|| "#".into());

        html! {
            <div class="card">
                <div class="card-content">
                    <div class="media">
                        <div class="media-left">
                            <figure class="image is-128x128">
                                <img src={thumbnail} alt="thumbnail"/>
                            </figure>
                        </div>
                        <div class="media-content">
                            <p class="title is-5">{self.controller.title_text().to_string()}</p>
                        </div>
                    </div>
                    <FormatSelect
                        label="Video format"
                        formats={info.video_formats.clone()}
                        selected={self.controller.video_format().map(String::from)}
                        onchange={ctx.link().callback(Message::VideoFormatChanged)}/>
                    <FormatSelect
                        label="Audio format"
                        formats={info.audio_formats.clone()}
                        selected={self.controller.audio_format().map(String::from)}
                        onchange={ctx.link().callback(Message::AudioFormatChanged)}/>
                    {match self.controller.playlist_visible() {
                        true => html! {
                            <PlaylistSelect
                                choices={self.controller.playlist().to_vec()}
                                ontoggle={ctx.link().callback(|(index, checked): (usize, bool)| Message::PlaylistItemChanged(index, checked))}
                                onselectall={ctx.link().callback(Message::PlaylistSelectAll)}/>
                        },
                        false => html! {},
                    }}
                </div>
            </div>
        }
    }
}

impl Component for Downloader {
    type Message = Message;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            controller: ClientController::new(&ctx.props().config),
            fetcher: fetcher::Fetcher::bridge(ctx.link().callback(Message::FetcherMessage)),
            poller: poller::Poller::bridge(ctx.link().callback(Message::PollerMessage)),
            notifier: notifier::Notifier::dispatcher(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match self.process_update(ctx, msg) {
            Ok(should_render) => should_render,
            Err(e) => {
                self.notifier.send(notifier::Request::NotifyError(e));
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <>
                <section class="section">
                    <h1 class="title">{"Media Downloader"}</h1>
                    { self.view_actions(ctx) }
                    { self.view_options(ctx) }
                    { self.view_info(ctx) }
                </section>
                <ProgressPanel
                    show_progress={self.controller.progress_visible()}
                    progress={self.controller.progress()}
                    status={self.controller.status_text().to_string()}
                    log={self.controller.log().to_vec()}
                    files={self.controller.downloaded_files().to_vec()}/>
            </>
        }
    }
}
