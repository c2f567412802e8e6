use crate::{
    controller::{LogLevel, LogLine},
    objects::CompletedFile,
};
use yew::prelude::*;

pub struct ProgressPanel {}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub show_progress: bool,
    pub progress: f64,
    pub status: String,
    pub log: Vec<LogLine>,
    pub files: Vec<CompletedFile>,
}

impl ProgressPanel {
    fn view_log_line(line: &LogLine) -> Html {
        let color = match line.level {
            LogLevel::Info => None,
            LogLevel::Success => Some("has-text-success"),
            LogLevel::Error => Some("has-text-danger"),
        };

        html! { <div class={classes!(color)}>{line.text.clone()}</div> }
    }

    fn view_files(files: &[CompletedFile]) -> Html {
        if files.is_empty() {
            return html! {};
        }

        html! {
            <div class="content">
                <h3>{"Downloaded files (manual):"}</h3>
                { for files.iter().map(|file| html! {
                    <p>
                        <a class="button download-link" href={file.url.clone()} target="_blank" download={file.name.clone()}>{file.name.clone()}</a>
                    </p>
                })}
            </div>
        }
    }
}

impl Component for ProgressPanel {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {}
    }

    fn update(&mut self, _ctx: &Context<Self>, _msg: Self::Message) -> bool {
        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();

        html! {
            <section class="section">
                {match props.show_progress {
                    true => html! {
                        <progress class="progress is-primary" value={props.progress.to_string()} max="100">
                            {format!("{:.0}%", props.progress)}
                        </progress>
                    },
                    false => html! {},
                }}
                <p class="has-text-weight-semibold">{props.status.clone()}</p>
                <div class="box log-messages">
                    { for props.log.iter().map(Self::view_log_line) }
                </div>
                { Self::view_files(&props.files) }
            </section>
        }
    }
}
