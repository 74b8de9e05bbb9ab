// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use citekit_io::Reference;
use csl::Atom;
use fnv::FnvHashMap;

/// Bibliographic entries indexed by id. Inserting and replacing are the same
/// operation.
#[derive(Default)]
pub(crate) struct ReferenceStore {
    refs: FnvHashMap<Atom, Reference>,
}

impl ReferenceStore {
    pub fn upsert_all(&mut self, refs: Vec<Reference>) {
        for refr in refs {
            let id = refr.id.clone();
            if self.refs.insert(id.clone(), refr).is_some() {
                debug!("replaced reference \"{}\"", id);
            }
        }
    }

    pub fn get(&self, id: &Atom) -> Option<&Reference> {
        self.refs.get(id)
    }

    pub fn contains(&self, id: &Atom) -> bool {
        self.refs.contains_key(id)
    }
}
