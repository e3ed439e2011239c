//! Mob categories: each one keeps the types registered under it and the
//! mobs of its kind that are alive in the world.

use std::collections::BTreeMap;
use std::sync::Arc;

use engine::{MobCategoryId, MobId, MobType, MobWorld, Vec2};
use tracing::{debug, warn};

pub trait MobCategory {
    fn id(&self) -> MobCategoryId;
    fn name(&self) -> &str;
    fn plural_name(&self) -> &str;
    /// Folder under the mob types directory holding this category's files.
    fn folder(&self) -> &str;

    fn create_mob(
        &mut self,
        world: &mut MobWorld,
        pos: Vec2,
        mob_type: &Arc<MobType>,
        angle: f32,
    ) -> Option<MobId>;
    fn erase_mob(&mut self, world: &mut MobWorld, id: MobId) -> bool;
    fn get_type(&self, name: &str) -> Option<&Arc<MobType>>;
    fn register_type(&mut self, mob_type: Arc<MobType>);
    fn clear_types(&mut self);
    fn get_type_names(&self) -> Vec<String>;
    fn mobs(&self) -> &[MobId];

    /// Drops ids the world already deleted on its own, e.g. through
    /// `apply_pending`.
    fn forget_deleted(&mut self, _world: &MobWorld) {}
}

/// Placeholder for mobs that belong nowhere. It never holds anything.
#[derive(Debug, Default)]
pub struct NoneCategory;

impl MobCategory for NoneCategory {
    fn id(&self) -> MobCategoryId {
        MobCategoryId::None
    }

    fn name(&self) -> &str {
        "None"
    }

    fn plural_name(&self) -> &str {
        "None"
    }

    fn folder(&self) -> &str {
        ""
    }

    fn create_mob(
        &mut self,
        _world: &mut MobWorld,
        _pos: Vec2,
        _mob_type: &Arc<MobType>,
        _angle: f32,
    ) -> Option<MobId> {
        None
    }

    fn erase_mob(&mut self, _world: &mut MobWorld, _id: MobId) -> bool {
        false
    }

    fn get_type(&self, _name: &str) -> Option<&Arc<MobType>> {
        None
    }

    fn register_type(&mut self, _mob_type: Arc<MobType>) {}

    fn clear_types(&mut self) {}

    fn get_type_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn mobs(&self) -> &[MobId] {
        &[]
    }
}

/// A category that owns a table of types and tracks its live mobs.
#[derive(Debug)]
pub struct TypedCategory {
    id: MobCategoryId,
    name: &'static str,
    plural_name: &'static str,
    types: BTreeMap<String, Arc<MobType>>,
    mobs: Vec<MobId>,
}

impl TypedCategory {
    pub fn new(id: MobCategoryId, name: &'static str, plural_name: &'static str) -> Self {
        Self {
            id,
            name,
            plural_name,
            types: BTreeMap::new(),
            mobs: Vec::new(),
        }
    }
}

impl MobCategory for TypedCategory {
    fn id(&self) -> MobCategoryId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn plural_name(&self) -> &str {
        self.plural_name
    }

    fn folder(&self) -> &str {
        self.id.internal_name()
    }

    fn create_mob(
        &mut self,
        world: &mut MobWorld,
        pos: Vec2,
        mob_type: &Arc<MobType>,
        angle: f32,
    ) -> Option<MobId> {
        if mob_type.category != self.id {
            warn!(
                mob_type = %mob_type.name,
                category = self.name,
                "mob_type_in_wrong_category"
            );
            return None;
        }
        let id = world.create_mob(pos, Arc::clone(mob_type), angle, &[]);
        self.mobs.push(id);
        Some(id)
    }

    fn erase_mob(&mut self, world: &mut MobWorld, id: MobId) -> bool {
        let Some(idx) = self.mobs.iter().position(|mob| *mob == id) else {
            return false;
        };
        self.mobs.remove(idx);
        world.delete_mob(id);
        true
    }

    fn get_type(&self, name: &str) -> Option<&Arc<MobType>> {
        self.types.get(name)
    }

    fn register_type(&mut self, mob_type: Arc<MobType>) {
        debug!(mob_type = %mob_type.name, category = self.name, "mob_type_registered");
        self.types.insert(mob_type.name.clone(), mob_type);
    }

    fn clear_types(&mut self) {
        self.types.clear();
    }

    fn get_type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    fn mobs(&self) -> &[MobId] {
        &self.mobs
    }

    fn forget_deleted(&mut self, world: &MobWorld) {
        self.mobs.retain(|id| world.contains(*id));
    }
}

/// Singular and plural display names for every category with types.
const CATEGORY_NAMES: [(MobCategoryId, &str, &str); 14] = [
    (MobCategoryId::Pikmin, "Pikmin", "Pikmin"),
    (MobCategoryId::Onions, "Onion", "Onions"),
    (MobCategoryId::Leaders, "Leader", "Leaders"),
    (MobCategoryId::Enemies, "Enemy", "Enemies"),
    (MobCategoryId::Treasures, "Treasure", "Treasures"),
    (MobCategoryId::Pellets, "Pellet", "Pellets"),
    (MobCategoryId::Drops, "Drop", "Drops"),
    (MobCategoryId::Resources, "Resource", "Resources"),
    (MobCategoryId::Tools, "Tool", "Tools"),
    (MobCategoryId::Tracks, "Track", "Tracks"),
    (MobCategoryId::Bouncers, "Bouncer", "Bouncers"),
    (MobCategoryId::GroupTasks, "Group task", "Group tasks"),
    (MobCategoryId::Scales, "Scale", "Scales"),
    (MobCategoryId::Custom, "Custom", "Custom"),
];

fn category_slot(id: MobCategoryId) -> usize {
    MobCategoryId::ALL
        .iter()
        .position(|category| *category == id)
        .unwrap_or_default()
}

#[derive(Default)]
pub struct CategoryManager {
    categories: Vec<Option<Box<dyn MobCategory>>>,
}

impl CategoryManager {
    /// A manager with the "none" category and one typed category per id.
    pub fn with_builtin_categories() -> Self {
        let mut manager = Self::default();
        manager.register_category(MobCategoryId::None, Box::new(NoneCategory));
        for (id, name, plural_name) in CATEGORY_NAMES {
            manager.register_category(id, Box::new(TypedCategory::new(id, name, plural_name)));
        }
        manager
    }

    pub fn register_category(&mut self, id: MobCategoryId, category: Box<dyn MobCategory>) {
        let slot = category_slot(id);
        if slot >= self.categories.len() {
            self.categories.resize_with(slot + 1, || None);
        }
        self.categories[slot] = Some(category);
    }

    pub fn get(&self, id: MobCategoryId) -> Option<&dyn MobCategory> {
        self.categories
            .get(category_slot(id))
            .and_then(|slot| slot.as_deref())
    }

    pub fn get_mut(&mut self, id: MobCategoryId) -> Option<&mut (dyn MobCategory + 'static)> {
        self.categories
            .get_mut(category_slot(id))
            .and_then(|slot| slot.as_deref_mut())
    }

    pub fn get_from_name(&self, name: &str) -> Option<&dyn MobCategory> {
        let found = self.iter().find(|category| category.name() == name);
        if found.is_none() {
            warn!(category = name, "mob_category_not_found");
        }
        found
    }

    pub fn get_from_pname(&self, plural_name: &str) -> Option<&dyn MobCategory> {
        self.iter()
            .find(|category| category.plural_name() == plural_name)
    }

    pub fn get_from_folder_name(&self, folder: &str) -> Option<&dyn MobCategory> {
        let found = self
            .iter()
            .find(|category| !category.folder().is_empty() && category.folder() == folder);
        if found.is_none() {
            warn!(folder, "mob_category_folder_not_found");
        }
        found
    }

    /// First type with this name, checking categories in id order.
    pub fn find_mob_type(&self, name: &str) -> Option<&Arc<MobType>> {
        self.iter().find_map(|category| category.get_type(name))
    }

    /// Registers the type under its own category.
    pub fn register_type(&mut self, mob_type: Arc<MobType>) -> bool {
        match self.get_mut(mob_type.category) {
            Some(category) => {
                category.register_type(mob_type);
                true
            }
            None => false,
        }
    }

    /// Spawns a mob of the named type through its category.
    pub fn create_mob(
        &mut self,
        world: &mut MobWorld,
        pos: Vec2,
        type_name: &str,
        angle: f32,
    ) -> Option<MobId> {
        let Some(mob_type) = self.find_mob_type(type_name).map(Arc::clone) else {
            warn!(mob_type = type_name, "mob_type_not_found");
            return None;
        };
        self.get_mut(mob_type.category)?
            .create_mob(world, pos, &mob_type, angle)
    }

    pub fn erase_mob(&mut self, world: &mut MobWorld, id: MobId) -> bool {
        let Some(category) = world.mob(id).map(|mob| mob.category_id()) else {
            return false;
        };
        self.get_mut(category)
            .is_some_and(|category| category.erase_mob(world, id))
    }

    pub fn forget_deleted(&mut self, world: &MobWorld) {
        for category in self.categories.iter_mut().flatten() {
            category.forget_deleted(world);
        }
    }

    pub fn clear(&mut self) {
        self.categories.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MobCategory> {
        self.categories.iter().filter_map(|slot| slot.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use engine::{ContentCatalog, MobTypeDatabase};

    use super::*;
    use crate::fsms;

    fn pikmin_type(name: &str) -> Arc<MobType> {
        let mut mob_type = MobType::new(name, MobCategoryId::Pikmin);
        fsms::create_category_fsm(&mut mob_type);
        Arc::new(mob_type)
    }

    fn world() -> MobWorld {
        MobWorld::new(
            MobTypeDatabase::default(),
            Arc::new(ContentCatalog::default()),
            1,
        )
    }

    #[test]
    fn types_are_listed_by_name() {
        let mut manager = CategoryManager::with_builtin_categories();
        manager.register_type(pikmin_type("Red Pikmin"));
        manager.register_type(pikmin_type("Blue Pikmin"));

        let pikmin = manager.get(MobCategoryId::Pikmin).expect("category");
        assert_eq!(pikmin.get_type_names(), vec!["Blue Pikmin", "Red Pikmin"]);
        assert!(pikmin.get_type("Red Pikmin").is_some());
        assert!(manager
            .get(MobCategoryId::Leaders)
            .expect("category")
            .get_type("Red Pikmin")
            .is_none());
    }

    #[test]
    fn types_are_found_across_categories() {
        let mut manager = CategoryManager::with_builtin_categories();
        manager.register_type(pikmin_type("Red Pikmin"));
        manager.register_type(Arc::new(MobType::new("Bulborb", MobCategoryId::Enemies)));

        let found = manager.find_mob_type("Bulborb").expect("type");
        assert_eq!(found.category, MobCategoryId::Enemies);
        assert!(manager.find_mob_type("Snitchbug").is_none());
    }

    #[test]
    fn categories_are_found_by_name_plural_and_folder() {
        let manager = CategoryManager::with_builtin_categories();
        assert_eq!(
            manager.get_from_name("Group task").map(|category| category.id()),
            Some(MobCategoryId::GroupTasks)
        );
        assert_eq!(
            manager.get_from_pname("Enemies").map(|category| category.id()),
            Some(MobCategoryId::Enemies)
        );
        assert_eq!(
            manager.get_from_folder_name("track").map(|category| category.id()),
            Some(MobCategoryId::Tracks)
        );
        assert!(manager.get_from_name("Ghost").is_none());
        assert!(manager.get_from_folder_name("").is_none());
    }

    #[test]
    fn created_mobs_are_tracked_until_erased() {
        let mut manager = CategoryManager::with_builtin_categories();
        manager.register_type(pikmin_type("Red Pikmin"));
        let mut world = world();

        let id = manager
            .create_mob(&mut world, Vec2::ZERO, "Red Pikmin", 0.0)
            .expect("mob");
        assert_eq!(world.mob(id).and_then(|mob| mob.state_name()), Some("idling"));
        assert_eq!(manager.get(MobCategoryId::Pikmin).expect("category").mobs(), &[id]);

        assert!(manager.erase_mob(&mut world, id));
        assert!(!world.contains(id));
        assert!(manager
            .get(MobCategoryId::Pikmin)
            .expect("category")
            .mobs()
            .is_empty());
        assert!(!manager.erase_mob(&mut world, id));
    }

    #[test]
    fn mobs_deleted_by_the_world_are_forgotten() {
        let mut manager = CategoryManager::with_builtin_categories();
        manager.register_type(pikmin_type("Red Pikmin"));
        let mut world = world();
        let id = manager
            .create_mob(&mut world, Vec2::ZERO, "Red Pikmin", 0.0)
            .expect("mob");

        world.mob_mut(id).expect("mob").flags.to_delete = true;
        world.apply_pending();
        manager.forget_deleted(&world);

        assert!(manager
            .get(MobCategoryId::Pikmin)
            .expect("category")
            .mobs()
            .is_empty());
    }

    #[test]
    fn categories_refuse_types_of_another_category() {
        let mut leaders = TypedCategory::new(MobCategoryId::Leaders, "Leader", "Leaders");
        let mut world = world();
        assert!(leaders
            .create_mob(&mut world, Vec2::ZERO, &pikmin_type("Red Pikmin"), 0.0)
            .is_none());
        assert_eq!(world.mob_count(), 0);
    }

    #[test]
    fn the_none_category_holds_nothing() {
        let mut none = NoneCategory;
        none.register_type(pikmin_type("Red Pikmin"));
        assert!(none.get_type_names().is_empty());
        assert!(none
            .create_mob(&mut world(), Vec2::ZERO, &pikmin_type("Red Pikmin"), 0.0)
            .is_none());
    }

    #[test]
    fn clearing_types_keeps_the_category() {
        let mut manager = CategoryManager::with_builtin_categories();
        manager.register_type(pikmin_type("Red Pikmin"));
        manager
            .get_mut(MobCategoryId::Pikmin)
            .expect("category")
            .clear_types();
        assert!(manager.find_mob_type("Red Pikmin").is_none());
        assert!(manager.get(MobCategoryId::Pikmin).is_some());

        manager.clear();
        assert!(manager.get(MobCategoryId::Pikmin).is_none());
    }
}
