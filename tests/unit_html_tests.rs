//! # HTML Shell Unit Tests / HTML 页面单元测试
//!
//! This module tests the polling page served by `GET /test`.
//!
//! 此模块测试由 `GET /test` 提供的轮询页面。

use webunit::reporting::render_shell;

#[cfg(test)]
mod shell_tests {
    use super::*;

    #[test]
    fn test_polls_once_before_the_interval() {
        let page = render_shell(5, "en").into_string();

        let first_poll = page.find("poll();").unwrap();
        let interval = page.find("setInterval(poll, pollMs)").unwrap();
        assert!(first_poll < interval);
    }

    #[test]
    fn test_poll_interval_is_in_milliseconds() {
        let page = render_shell(2, "en").into_string();
        assert!(page.contains(r#"data-poll-ms="2000""#));

        let page = render_shell(0, "en").into_string();
        assert!(page.contains(r#"data-poll-ms="1000""#));
    }

    #[test]
    fn test_result_elements_are_present() {
        let page = render_shell(5, "en").into_string();
        for id in ["testindicator", "testran", "testtotal", "testerror", "testfailure", "errorarea"] {
            assert!(page.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
    }
}
