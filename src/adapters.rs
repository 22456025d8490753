use crate::model::object::{ObjectError, ObjectPage, RemoteObject};

#[cfg(test)]
pub mod mock;
pub mod s3;

/// The store capabilities a sync needs. Implementations block until the
/// store has answered.
pub trait ObjectAdapter {
    fn fs_list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, ObjectError>;

    fn fs_download_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectError>;

    fn fs_put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ObjectError>;

    /// Lists every object under `prefix`, following continuation tokens
    /// until the store reports the last page.
    fn fs_list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<RemoteObject>, ObjectError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self.fs_list_objects_page(bucket, prefix, continuation_token.clone())?;
            objects.extend(page.objects);

            match page.next_continuation_token {
                None => break,
                Some(tok) if continuation_token.as_deref() == Some(tok.as_str()) => {
                    return Err(ObjectError::new(format!(
                        "store repeated continuation token `{}` listing: {}",
                        tok, prefix
                    )));
                }
                Some(tok) => continuation_token = Some(tok),
            }
        }

        Ok(objects)
    }
}
