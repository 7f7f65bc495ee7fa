use crate::constants::Message;
use crate::external_api::context::FetchContext;
use crate::external_api::qiita_api::QiitaApi;
use crate::external_api::ApiError;
use std::io::Write;

/// Lists every tag and writes `id, followers_count` lines to `output`
///
/// Returns the number of printed tags
pub async fn print_tags<W>(
    qiita_api: &QiitaApi,
    ctx: &FetchContext,
    mut output: W,
) -> Result<usize, ApiError>
where
    W: Write,
{
    let tags = qiita_api.list_tags(ctx).await?;
    for tag in &tags {
        writeln!(
            output,
            "{}",
            Message::TagLine(tag.id.clone(), tag.followers_count).to_formatted_string()
        )?;
    }
    output.flush()?;
    Ok(tags.len())
}
