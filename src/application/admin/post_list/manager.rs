use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::application::repos::PostsWriteRepo;
use crate::domain::{entities::PostRecord, posts::Bucket};
use crate::util::lock::mutex_lock;

use super::drag::{DragEnd, ItemRect, Point, closest_center, keyboard_target};
use super::reorder::OrderUpdate;
use super::state::PostListState;
use super::types::{
    AdminPostListError, Confirmation, DELETE_FAILED_ALERT, DELETE_PROMPT, DeleteOutcome,
    MoveDirection, Notifier, ReorderOutcome, VisiblePosts,
};

const SOURCE: &str = "application::admin::post_list";

/// Admin post list bound to the backend that persists its changes.
///
/// Local state is updated synchronously before any network call. Order
/// writes are fire-and-forget; a failed write leaves the local order in
/// place and is only logged. The state lock is never held across an await.
pub struct PostListManager {
    state: Mutex<PostListState>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostListManager {
    pub fn new(records: Vec<PostRecord>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self::from_state(PostListState::new(records), writer)
    }

    pub fn from_state(state: PostListState, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self {
            state: Mutex::new(state),
            writer,
        }
    }

    pub fn posts(&self) -> Vec<PostRecord> {
        mutex_lock(&self.state, SOURCE, "posts").posts().to_vec()
    }

    pub fn visible(&self) -> VisiblePosts {
        mutex_lock(&self.state, SOURCE, "visible").compute_visible()
    }

    pub fn active_bucket(&self) -> Bucket {
        mutex_lock(&self.state, SOURCE, "active_bucket").active_bucket()
    }

    pub fn search_query(&self) -> String {
        mutex_lock(&self.state, SOURCE, "search_query")
            .search_query()
            .to_string()
    }

    pub fn select_bucket(&self, bucket: Bucket) {
        mutex_lock(&self.state, SOURCE, "select_bucket").select_bucket(bucket);
    }

    pub fn search(&self, query: impl Into<String>) {
        mutex_lock(&self.state, SOURCE, "search").search(query);
    }

    pub fn set_page(&self, page: usize) {
        mutex_lock(&self.state, SOURCE, "set_page").set_page(page);
    }

    pub fn next_page(&self) {
        mutex_lock(&self.state, SOURCE, "next_page").next_page();
    }

    pub fn previous_page(&self) {
        mutex_lock(&self.state, SOURCE, "previous_page").previous_page();
    }

    /// Full remount with a freshly fetched collection.
    pub fn replace(&self, records: Vec<PostRecord>) {
        let count = records.len();
        mutex_lock(&self.state, SOURCE, "replace").replace(records);
        info!(target = "folio::admin::post_list", posts = count, "Post list reloaded");
    }

    /// Apply a completed drag. Must run inside a tokio runtime.
    pub fn on_drag_end(&self, end: &DragEnd) -> Result<ReorderOutcome, AdminPostListError> {
        match end.target.as_deref() {
            Some(target) if target != end.moved => self.reorder(&end.moved, target),
            _ => Ok(ReorderOutcome::Unchanged),
        }
    }

    /// Resolve the drop target among the rendered rects, then reorder.
    pub fn drop_at(
        &self,
        moved: &str,
        pointer: Point,
        rendered: &[ItemRect],
    ) -> Result<ReorderOutcome, AdminPostListError> {
        let end = DragEnd {
            moved: moved.to_string(),
            target: closest_center(pointer, rendered).map(str::to_string),
        };
        self.on_drag_end(&end)
    }

    /// Keyboard reorder: swap places with the rendered neighbour.
    pub fn move_by_keyboard(
        &self,
        id: &str,
        direction: MoveDirection,
    ) -> Result<ReorderOutcome, AdminPostListError> {
        let target = {
            let state = mutex_lock(&self.state, SOURCE, "move_by_keyboard");
            if state.index_of(id).is_none() {
                return Err(AdminPostListError::UnknownPost(id.to_string()));
            }
            let rendered = state.visible_ids();
            keyboard_target(&rendered, id, direction).map(str::to_string)
        };

        match target {
            Some(target) => self.reorder(id, &target),
            None => Ok(ReorderOutcome::Unchanged),
        }
    }

    /// Move `moved` onto `target`'s position in the full working list.
    ///
    /// The target must be on the rendered page. One persistence write is
    /// spawned per record whose `order_index` changed.
    pub fn reorder(
        &self,
        moved: &str,
        target: &str,
    ) -> Result<ReorderOutcome, AdminPostListError> {
        if moved == target {
            return Ok(ReorderOutcome::Unchanged);
        }

        let updates = {
            let mut state = mutex_lock(&self.state, SOURCE, "reorder");
            if state.index_of(target).is_some() && !state.is_visible(target) {
                return Err(AdminPostListError::TargetNotVisible(target.to_string()));
            }
            state.reorder(moved, target)?
        };

        info!(
            target = "folio::admin::reorder",
            moved,
            over = target,
            writes = updates.len(),
            "Post reordered"
        );

        for update in &updates {
            self.dispatch_order_write(update.clone());
        }

        Ok(ReorderOutcome::Applied { updates })
    }

    fn dispatch_order_write(&self, update: OrderUpdate) {
        let writer = self.writer.clone();
        tokio::spawn(async move {
            if let Err(err) = writer
                .update_order_index(&update.id, update.order_index)
                .await
            {
                warn!(
                    target = "folio::admin::reorder",
                    post_id = %update.id,
                    order_index = update.order_index,
                    error = %err,
                    "Order write failed; local order kept"
                );
            }
        });
    }

    /// Delete after confirmation, removing the record locally first.
    ///
    /// A backend failure alerts once and does not restore the record.
    pub async fn delete(
        &self,
        id: &str,
        confirmation: &dyn Confirmation,
        notifier: &dyn Notifier,
    ) -> DeleteOutcome {
        if !confirmation.confirm(DELETE_PROMPT) {
            debug!(target = "folio::admin::delete", post_id = id, "Delete declined");
            return DeleteOutcome::Declined;
        }

        let removed = mutex_lock(&self.state, SOURCE, "delete").remove(id);
        if removed.is_none() {
            debug!(
                target = "folio::admin::delete",
                post_id = id,
                "Post not in working list; deleting remotely only"
            );
        }

        match self.writer.delete_post(id).await {
            Ok(()) => {
                info!(target = "folio::admin::delete", post_id = id, "Post deleted");
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(
                    target = "folio::admin::delete",
                    post_id = id,
                    error = %err,
                    "Backend rejected delete; local removal kept"
                );
                notifier.alert(DELETE_FAILED_ALERT);
                DeleteOutcome::RemovedLocallyOnly
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::application::repos::{PostWriteParams, RepoError};
    use crate::domain::posts::fixtures::post;

    struct RecordingWriter {
        order_tx: mpsc::UnboundedSender<(String, i64)>,
        fail_orders: bool,
        fail_delete: bool,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl PostsWriteRepo for RecordingWriter {
        async fn update_order_index(&self, id: &str, order_index: i64) -> Result<(), RepoError> {
            let _ = self.order_tx.send((id.to_string(), order_index));
            if self.fail_orders {
                Err(RepoError::Persistence("offline".into()))
            } else {
                Ok(())
            }
        }

        async fn delete_post(&self, _id: &str) -> Result<(), RepoError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                Err(RepoError::Persistence("offline".into()))
            } else {
                Ok(())
            }
        }

        async fn create_post(&self, _params: PostWriteParams) -> Result<PostRecord, RepoError> {
            Err(RepoError::Persistence("unused".into()))
        }

        async fn update_post(
            &self,
            _id: &str,
            _params: PostWriteParams,
        ) -> Result<PostRecord, RepoError> {
            Err(RepoError::Persistence("unused".into()))
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl Notifier for CountingNotifier {
        fn alert(&self, message: &str) {
            mutex_lock(&self.alerts, "tests", "alert").push(message.to_string());
        }
    }

    fn writer(
        fail_orders: bool,
        fail_delete: bool,
    ) -> (Arc<RecordingWriter>, mpsc::UnboundedReceiver<(String, i64)>) {
        let (order_tx, rx) = mpsc::unbounded_channel();
        let writer = Arc::new(RecordingWriter {
            order_tx,
            fail_orders,
            fail_delete,
            deletes: AtomicUsize::new(0),
        });
        (writer, rx)
    }

    fn five_posts() -> Vec<PostRecord> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .enumerate()
            .map(|(i, id)| post(id, i as i64))
            .collect()
    }

    async fn collect_writes(
        rx: &mut mpsc::UnboundedReceiver<(String, i64)>,
        count: usize,
    ) -> Vec<(String, i64)> {
        let mut writes = Vec::new();
        for _ in 0..count {
            let write = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("write dispatched")
                .expect("channel open");
            writes.push(write);
        }
        writes.sort();
        writes
    }

    #[tokio::test]
    async fn reorder_dispatches_one_write_per_changed_record() {
        let (writer, mut rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer);

        let outcome = manager.reorder("c", "a").expect("reorder applies");
        assert!(matches!(outcome, ReorderOutcome::Applied { ref updates } if updates.len() == 3));

        let writes = collect_writes(&mut rx, 3).await;
        assert_eq!(
            writes,
            vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 0)]
        );

        let order: Vec<_> = manager.posts().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, ["c", "a", "b", "d", "e"]);
    }

    #[tokio::test]
    async fn failed_order_writes_do_not_roll_back() {
        let (writer, mut rx) = writer(true, false);
        let manager = PostListManager::new(five_posts(), writer);

        manager.reorder("e", "a").expect("reorder applies");
        collect_writes(&mut rx, 5).await;
        tokio::task::yield_now().await;

        let order: Vec<_> = manager.posts().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, ["e", "a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn drag_end_without_a_distinct_target_is_ignored() {
        let (writer, _rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer);

        let same = DragEnd {
            moved: "a".into(),
            target: Some("a".into()),
        };
        let none = DragEnd {
            moved: "a".into(),
            target: None,
        };
        assert_eq!(manager.on_drag_end(&same), Ok(ReorderOutcome::Unchanged));
        assert_eq!(manager.on_drag_end(&none), Ok(ReorderOutcome::Unchanged));
    }

    #[tokio::test]
    async fn targets_off_the_rendered_page_are_rejected() {
        let (writer, _rx) = writer(false, false);
        let records = (0..25).map(|i| post(&format!("p{i}"), i)).collect();
        let manager = PostListManager::new(records, writer);

        let err = manager.reorder("p0", "p24").expect_err("p24 is on page two");
        assert_eq!(err, AdminPostListError::TargetNotVisible("p24".into()));
        assert_eq!(manager.posts()[0].id, "p0");
    }

    #[tokio::test]
    async fn keyboard_move_swaps_with_rendered_neighbour() {
        let (writer, mut rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer);

        manager
            .move_by_keyboard("b", MoveDirection::Down)
            .expect("move applies");
        collect_writes(&mut rx, 2).await;
        let order: Vec<_> = manager.posts().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, ["a", "c", "b", "d", "e"]);

        assert_eq!(
            manager.move_by_keyboard("a", MoveDirection::Up),
            Ok(ReorderOutcome::Unchanged)
        );
    }

    #[tokio::test]
    async fn drop_at_resolves_nearest_rendered_item() {
        let (writer, mut rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer);
        let rects: Vec<ItemRect> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, id)| ItemRect {
                id: id.to_string(),
                left: 0.0,
                top: i as f64 * 50.0,
                width: 100.0,
                height: 40.0,
            })
            .collect();

        manager
            .drop_at("c", Point::new(50.0, 5.0), &rects)
            .expect("drop applies");
        collect_writes(&mut rx, 3).await;
        assert_eq!(manager.posts()[0].id, "c");
    }

    #[tokio::test]
    async fn declined_delete_is_a_no_op() {
        let (writer, _rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer.clone());
        let notifier = CountingNotifier::default();

        let outcome = manager.delete("a", &false, &notifier).await;
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(manager.posts().len(), 5);
        assert_eq!(writer.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_and_persists() {
        let (writer, _rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer.clone());
        let notifier = CountingNotifier::default();

        let outcome = manager.delete("b", &true, &notifier).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(manager.posts().iter().all(|p| p.id != "b"));
        assert_eq!(writer.deletes.load(Ordering::SeqCst), 1);
        assert!(mutex_lock(&notifier.alerts, "tests", "read").is_empty());
    }

    #[tokio::test]
    async fn failed_delete_alerts_once_without_rollback() {
        let (writer, _rx) = writer(false, true);
        let manager = PostListManager::new(five_posts(), writer);
        let notifier = CountingNotifier::default();

        let outcome = manager.delete("b", &true, &notifier).await;
        assert_eq!(outcome, DeleteOutcome::RemovedLocallyOnly);
        assert!(manager.posts().iter().all(|p| p.id != "b"));

        let alerts = mutex_lock(&notifier.alerts, "tests", "read").clone();
        assert_eq!(alerts, vec![DELETE_FAILED_ALERT.to_string()]);
    }

    #[tokio::test]
    async fn replace_keeps_ui_state() {
        let (writer, _rx) = writer(false, false);
        let manager = PostListManager::new(five_posts(), writer);
        manager.select_bucket(Bucket::Projects);
        manager.search("x");

        manager.replace(vec![post("z", 0)]);
        assert_eq!(manager.active_bucket(), Bucket::Projects);
        assert_eq!(manager.search_query(), "x");
        assert_eq!(manager.posts().len(), 1);
    }
}
