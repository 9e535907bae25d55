use std::collections::HashMap;

use crate::application::pagination::{ADMIN_PAGE_SIZE, PageWindow};
use crate::domain::{
    entities::PostRecord,
    posts::{Bucket, SearchNeedle, sort_for_listing},
};

use super::reorder::{OrderUpdate, move_and_reindex};
use super::types::{AdminPostListError, BucketCount, VisiblePosts};

/// Working state of the admin post list.
///
/// The working list is always a permutation of the records it was
/// initialized with, minus deletions. Page numbers are remembered per bucket
/// so switching tabs keeps each tab's position.
#[derive(Debug, Clone)]
pub struct PostListState {
    posts: Vec<PostRecord>,
    active: Bucket,
    search: String,
    pages: HashMap<Bucket, usize>,
    page_size: usize,
}

impl PostListState {
    pub fn new(records: Vec<PostRecord>) -> Self {
        Self::with_page_size(records, ADMIN_PAGE_SIZE)
    }

    pub fn with_page_size(mut records: Vec<PostRecord>, page_size: usize) -> Self {
        sort_for_listing(&mut records);
        Self {
            posts: records,
            active: Bucket::default(),
            search: String::new(),
            pages: HashMap::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn active_bucket(&self) -> Bucket {
        self.active
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    /// Requested page of the active bucket, before clamping.
    pub fn requested_page(&self) -> usize {
        self.pages.get(&self.active).copied().unwrap_or(1)
    }

    pub fn select_bucket(&mut self, bucket: Bucket) {
        self.active = bucket;
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.pages.insert(self.active, 1);
    }

    pub fn set_page(&mut self, page: usize) {
        self.pages.insert(self.active, page);
    }

    pub fn next_page(&mut self) {
        let window = self.window();
        self.set_page(window.page + 1);
    }

    pub fn previous_page(&mut self) {
        let window = self.window();
        self.set_page(window.page.saturating_sub(1));
    }

    /// Bucket membership, then search, in working-list order.
    pub fn filtered(&self) -> Vec<&PostRecord> {
        let needle = SearchNeedle::new(&self.search);
        self.posts
            .iter()
            .filter(|post| self.active.contains(post))
            .filter(|post| needle.as_ref().is_none_or(|n| n.matches(post)))
            .collect()
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::clamp(
            self.requested_page(),
            self.filtered().len(),
            self.page_size,
        )
    }

    pub fn compute_visible(&self) -> VisiblePosts {
        let filtered = self.filtered();
        let window = PageWindow::clamp(self.requested_page(), filtered.len(), self.page_size);
        let items = window
            .slice(&filtered)
            .iter()
            .map(|post| (*post).clone())
            .collect();

        VisiblePosts {
            bucket: self.active,
            search: self.search.clone(),
            items,
            window,
            counts: self.bucket_counts(),
        }
    }

    pub fn bucket_counts(&self) -> Vec<BucketCount> {
        Bucket::ALL
            .iter()
            .map(|bucket| BucketCount {
                bucket: *bucket,
                count: self.posts.iter().filter(|p| bucket.contains(p)).count(),
            })
            .collect()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|post| post.id == id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        let filtered = self.filtered();
        let window = PageWindow::clamp(self.requested_page(), filtered.len(), self.page_size);
        window.slice(&filtered).iter().any(|post| post.id == id)
    }

    /// Ids of the rendered page, top to bottom.
    pub fn visible_ids(&self) -> Vec<String> {
        let filtered = self.filtered();
        let window = PageWindow::clamp(self.requested_page(), filtered.len(), self.page_size);
        window
            .slice(&filtered)
            .iter()
            .map(|post| post.id.clone())
            .collect()
    }

    /// Move `moved` to the full-list position of `target` and reindex.
    ///
    /// Returns no updates when the ids are equal.
    pub fn reorder(
        &mut self,
        moved: &str,
        target: &str,
    ) -> Result<Vec<OrderUpdate>, AdminPostListError> {
        let from = self
            .index_of(moved)
            .ok_or_else(|| AdminPostListError::UnknownPost(moved.to_string()))?;
        let to = self
            .index_of(target)
            .ok_or_else(|| AdminPostListError::UnknownPost(target.to_string()))?;

        if from == to {
            return Ok(Vec::new());
        }

        Ok(move_and_reindex(&mut self.posts, from, to))
    }

    pub fn remove(&mut self, id: &str) -> Option<PostRecord> {
        let index = self.index_of(id)?;
        Some(self.posts.remove(index))
    }

    /// Swap in a freshly fetched collection, keeping tab, search and pages.
    pub fn replace(&mut self, mut records: Vec<PostRecord>) {
        sort_for_listing(&mut records);
        self.posts = records;
    }
}
