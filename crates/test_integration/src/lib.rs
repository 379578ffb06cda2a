#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_wrap
)]

#[cfg(test)]
pub mod runner;
#[cfg(test)]
pub mod test_helpers;
#[cfg(test)]
pub mod tests;

#[cfg(test)]
mod test_runner {
    use crate::runner::context::test_context::TestContext;
    use crate::runner::orchestration_utils::setup_tracing_and_panic_handling;
    use crate::tests::test_auth::{test_get_user, test_google_sign_in, test_invalid_token};
    use crate::tests::test_interactions::{
        test_comments, test_concurrent_likes, test_like_toggle, test_owner_deletes_comment,
    };
    use crate::tests::test_photos::{
        test_delete_photo, test_list_photos, test_malformed_requests, test_photo_detail_views,
        test_update_photo,
    };
    use crate::tests::test_root::{test_cors_header, test_health_endpoint, test_root_banner};
    use crate::tests::test_storage::{
        test_delete_file, test_upload_gif, test_upload_not_multipart, test_upload_oversize,
        test_upload_png, test_upload_without_file,
    };
    use crate::tests::test_users::{test_request_creator, test_update_role};
    use crate::{execute_suite, run_test};
    use color_eyre::Result;
    use colored::*;
    use std::time::Instant;

    #[tokio::test]
    async fn integration_suite() -> Result<()> {
        setup_tracing_and_panic_handling();
        let context = TestContext::new().await?;

        execute_suite!(
            &context,
            [
                // -- Root --
                test_root_banner,
                test_health_endpoint,
                test_cors_header,
                // -- Auth --
                test_google_sign_in,
                test_invalid_token,
                test_get_user,
                // -- Users --
                test_request_creator,
                test_update_role,
                // -- Photos --
                test_list_photos,
                test_photo_detail_views,
                test_update_photo,
                test_delete_photo,
                test_malformed_requests,
                // -- Interactions --
                test_like_toggle,
                test_concurrent_likes,
                test_comments,
                test_owner_deletes_comment,
                // -- Storage --
                test_upload_png,
                test_upload_gif,
                test_upload_oversize,
                test_upload_not_multipart,
                test_upload_without_file,
                test_delete_file,
            ]
        );

        context.shutdown().await;
        Ok(())
    }
}
