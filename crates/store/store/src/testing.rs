use harbor_core::{DIRECT_DOWNLOAD_ID, DownloadItem, DownloadStatus};

use crate::error::StoreError;
use crate::repository::DownloadsRepository;

/// Run the full downloads repository conformance test suite.
///
/// Call this from your backend's test module with a fresh, empty repository.
///
/// # Errors
///
/// Returns an error if the backend fails an operation.
pub async fn run_repository_conformance_tests(
    repo: &dyn DownloadsRepository,
) -> Result<(), StoreError> {
    test_get_missing(repo).await?;
    test_insert_and_get(repo).await?;
    test_update_by_id(repo).await?;
    test_update_by_file_name(repo).await?;
    test_update_missing(repo).await?;
    test_get_downloads_newest_first(repo).await?;
    test_delete(repo).await?;
    test_delete_all(repo).await?;
    Ok(())
}

async fn test_get_missing(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    let item = repo.get_download_item(9_999).await?;
    assert!(item.is_none(), "get on missing id should return None");
    Ok(())
}

async fn test_insert_and_get(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    let item = DownloadItem::started(101, "report.pdf", "/downloads/report.pdf");
    repo.insert(item.clone()).await?;
    let stored = repo.get_download_item(101).await?;
    assert_eq!(stored, Some(item));
    Ok(())
}

async fn test_update_by_id(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    repo.insert(DownloadItem::started(102, "song.mp3", "/downloads/song.mp3"))
        .await?;
    let updated = repo
        .update_by_id(102, DownloadStatus::Finished, 4_096)
        .await?;
    assert_eq!(updated, 1);

    let stored = repo
        .get_download_item(102)
        .await?
        .expect("updated download should exist");
    assert_eq!(stored.status, DownloadStatus::Finished);
    assert_eq!(stored.content_length, 4_096);
    Ok(())
}

async fn test_update_by_file_name(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    repo.insert(DownloadItem::started(
        DIRECT_DOWNLOAD_ID,
        "inline.png",
        "/downloads/inline.png",
    ))
    .await?;
    let updated = repo
        .update_by_file_name("inline.png", DownloadStatus::Finished, 68)
        .await?;
    assert_eq!(updated, 1);

    let stored = repo
        .get_downloads()
        .await?
        .into_iter()
        .find(|item| item.file_name == "inline.png")
        .expect("updated download should exist");
    assert_eq!(stored.status, DownloadStatus::Finished);
    assert_eq!(stored.content_length, 68);
    Ok(())
}

async fn test_update_missing(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    let updated = repo
        .update_by_id(8_888, DownloadStatus::Finished, 1)
        .await?;
    assert_eq!(updated, 0, "updating a missing id should touch nothing");

    let updated = repo
        .update_by_file_name("missing.bin", DownloadStatus::Finished, 1)
        .await?;
    assert_eq!(updated, 0, "updating a missing file should touch nothing");
    Ok(())
}

async fn test_get_downloads_newest_first(
    repo: &dyn DownloadsRepository,
) -> Result<(), StoreError> {
    let mut older = DownloadItem::started(201, "older.txt", "/downloads/older.txt");
    older.created_at -= chrono::Duration::hours(1);
    let newer = DownloadItem::started(202, "newer.txt", "/downloads/newer.txt");
    repo.insert(older).await?;
    repo.insert(newer).await?;

    let all = repo.get_downloads().await?;
    let older_pos = all
        .iter()
        .position(|i| i.download_id == 201)
        .expect("older download should be listed");
    let newer_pos = all
        .iter()
        .position(|i| i.download_id == 202)
        .expect("newer download should be listed");
    assert!(
        newer_pos < older_pos,
        "downloads should be ordered newest first"
    );
    Ok(())
}

async fn test_delete(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    repo.insert(DownloadItem::started(301, "gone.zip", "/downloads/gone.zip"))
        .await?;
    let removed = repo.delete(301).await?;
    assert_eq!(removed, 1);
    assert!(repo.get_download_item(301).await?.is_none());

    let removed = repo.delete(301).await?;
    assert_eq!(removed, 0, "deleting a missing id should remove nothing");
    Ok(())
}

async fn test_delete_all(repo: &dyn DownloadsRepository) -> Result<(), StoreError> {
    let before = repo.get_downloads().await?.len() as u64;
    let removed = repo.delete_all().await?;
    assert_eq!(removed, before);
    assert!(repo.get_downloads().await?.is_empty());
    Ok(())
}
