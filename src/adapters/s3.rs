use aws_sdk_s3::{
    config::http::HttpResponse,
    error::{DisplayErrorContext, SdkError},
    primitives::ByteStream,
};

use crate::{
    adapters,
    model::object::{ObjectError, ObjectPage, RemoteObject},
    util,
};

fn sdk_error<E>(context: String, err: SdkError<E, HttpResponse>) -> ObjectError
where
    E: std::error::Error + 'static,
{
    let status = err.raw_response().map(|res| res.status().as_u16());

    ObjectError {
        message: format!("{}, {}", context, DisplayErrorContext(&err)),
        status,
    }
}

impl adapters::ObjectAdapter for aws_sdk_s3::Client {
    fn fs_list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, ObjectError> {
        let mut req = self.list_objects_v2().bucket(bucket);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }
        if let Some(tok) = continuation_token {
            req = req.continuation_token(tok);
        }

        let lo = util::poll::poll_until_ready(req.send())
            .map_err(|err| sdk_error(format!("failed to list_objects at: {}", prefix), err))?;

        let objects = lo
            .contents()
            .iter()
            .filter_map(|o| {
                o.key().map(|key| RemoteObject {
                    key: key.to_string(),
                    size: o.size().and_then(|size| u64::try_from(size).ok()),
                })
            })
            .collect();

        // some S3-compatible stores hand back a token on the last page
        let next_continuation_token = if lo.is_truncated() == Some(false) {
            None
        } else {
            lo.next_continuation_token().map(|tok| tok.to_string())
        };

        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    fn fs_download_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectError> {
        let req = self.get_object().bucket(bucket).key(key);

        let o = util::poll::poll_until_ready(req.send())
            .map_err(|err| sdk_error(format!("failed to get_object: {}", key), err))?;

        let bytes = util::poll::poll_until_ready(o.body.collect()).map_err(|err| {
            ObjectError::new(format!("failed to collect body: {}, {}", key, err))
        })?;

        Ok(bytes.into_bytes().to_vec())
    }

    fn fs_put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ObjectError> {
        let req = self
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body));

        util::poll::poll_until_ready(req.send())
            .map_err(|err| sdk_error(format!("failed to put_object at: {}", key), err))?;

        Ok(())
    }
}
