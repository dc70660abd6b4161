//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the polling shell served by `GET /test`. The page itself
//! is static; its script fetches `/testresult` on a fixed interval and fills in
//! the counters, the red/green indicator and the error/failure blocks.
//!
//! 此模块渲染由 `GET /test` 提供的轮询页面。页面本身是静态的；
//! 其脚本按固定间隔获取 `/testresult`，并填充计数器、红/绿指示条以及错误/失败区块。

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::infra::t;

/// Embedded CSS styles for the result page / 结果页面的嵌入式 CSS 样式
const SHELL_STYLE: &str = include_str!("assets/shell.css");

/// Embedded JavaScript polling the result endpoint / 轮询结果端点的嵌入式 JavaScript
const SHELL_SCRIPT: &str = include_str!("assets/shell.js");

/// Renders the polling page.
///
/// # Arguments / 参数
/// * `poll_interval_secs` - Seconds between two polls / 两次轮询之间的秒数
/// * `locale` - The locale used for the page labels / 页面标签使用的语言环境
pub fn render_shell(poll_interval_secs: u64, locale: &str) -> Markup {
    let title = t!("html_shell.title", locale = locale);
    let poll_ms = poll_interval_secs.max(1) * 1000;

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(SHELL_STYLE)) }
            }
            body data-poll-ms=(poll_ms) {
                div #headerarea {
                    div #title { (title) }
                    div #version { "version " (env!("CARGO_PKG_VERSION")) }
                }
                div #resultarea {
                    table #results {
                        tbody {
                            tr { td colspan="3" { div #testindicator { " " } } }
                            tr {
                                td { (t!("html_shell.runs", locale = locale)) ": " span #testran { "0" } "/" span #testtotal { "0" } }
                                td { (t!("html_shell.errors", locale = locale)) ": " span #testerror { "0" } }
                                td { (t!("html_shell.failures", locale = locale)) ": " span #testfailure { "0" } }
                            }
                        }
                    }
                }
                div #errorarea { (t!("html_shell.waiting", locale = locale)) }
                div #footerarea { (t!("html_shell.footer", locale = locale)) }
                script { (PreEscaped(SHELL_SCRIPT)) }
            }
        }
    }
}
