//! Ordered cue collection.
//!
//! Order matters: IndexAction cues resolve targets by position, so the list
//! is a Vec with id lookups rather than a map.

use uuid::Uuid;

use super::cue::Cue;
use crate::error::CueError;

/// The session's ordered list of cues.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CueList {
    cues: Vec<Cue>,
}

impl CueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cue. Ids must be unique within the list.
    pub fn insert(&mut self, cue: Cue) -> Result<(), CueError> {
        if self.get(cue.id).is_some() {
            return Err(CueError::DuplicateCue(cue.id));
        }
        self.cues.push(cue);
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Cue> {
        self.cues.iter_mut().find(|c| c.id == id)
    }

    /// 0-based position of a cue in the list.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.cues.iter().position(|c| c.id == id)
    }

    pub fn by_index(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Cue> {
        let pos = self.position(id)?;
        Some(self.cues.remove(pos))
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.cues.iter().map(|c| c.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cue::CueKind;

    #[test]
    fn test_insert_and_lookup() {
        let mut list = CueList::new();
        let a = Cue::new(CueKind::Media, "a");
        let b = Cue::new(CueKind::Command, "b");
        let (ida, idb) = (a.id, b.id);

        list.insert(a).unwrap();
        list.insert(b).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.position(ida), Some(0));
        assert_eq!(list.position(idb), Some(1));
        assert_eq!(list.by_index(1).map(|c| c.id), Some(idb));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut list = CueList::new();
        let cue = Cue::new(CueKind::StopAll, "panic");
        let dup = cue.clone();
        list.insert(cue).unwrap();
        assert!(matches!(list.insert(dup), Err(CueError::DuplicateCue(_))));
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut list = CueList::new();
        let a = Cue::new(CueKind::Media, "a");
        let b = Cue::new(CueKind::Media, "b");
        let c = Cue::new(CueKind::Media, "c");
        let (ida, idc) = (a.id, c.id);
        list.insert(a).unwrap();
        list.insert(b).unwrap();
        list.insert(c).unwrap();

        let removed = list.remove(ida).unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(list.position(idc), Some(1));
        assert!(list.remove(ida).is_none());
    }
}
