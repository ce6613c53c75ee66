use crate::graph::{
    Graph, ImportDetails, IMPORT_LINE_CONTENTS, MODULE_NAMES, Module, ModuleToken,
};
use rustc_hash::FxHashSet;
use slotmap::secondary::Entry;

impl Graph {
    /// `foo.bar.baz => [foo.bar.baz, foo.bar, foo]`
    pub(crate) fn module_name_to_self_and_ancestors(&self, name: &str) -> Vec<String> {
        let mut names = vec![name.to_owned()];
        while let Some(parent_name) = parent_name(names.last().unwrap()) {
            names.push(parent_name);
        }
        names
    }

    pub fn get_or_add_module(&mut self, name: &str) -> &Module {
        if let Some(module) = self.get_module_by_name(name) {
            let module = self.modules.get_mut(module.token()).unwrap();
            module.is_invisible = false;
            return module;
        }

        let mut ancestor_names = self.module_name_to_self_and_ancestors(name);

        {
            let mut interner = MODULE_NAMES.write().unwrap();
            let mut parent: Option<ModuleToken> = None;
            while let Some(name) = ancestor_names.pop() {
                let name = interner.get_or_intern(name);
                if let Some(module) = self.modules_by_name.get_by_left(&name) {
                    parent = Some(*module)
                } else {
                    let module = self.modules.insert_with_key(|token| Module {
                        token,
                        interned_name: name,
                        is_invisible: !ancestor_names.is_empty(),
                    });
                    self.modules_by_name.insert(name, module);
                    self.module_parents.insert(module, parent);
                    self.module_children.insert(module, FxHashSet::default());
                    self.imports.insert(module, FxHashSet::default());
                    self.reverse_imports.insert(module, FxHashSet::default());
                    if let Some(parent) = parent {
                        self.module_children[parent].insert(module);
                    }
                    parent = Some(module)
                }
            }
        }

        self.get_module_by_name(name).unwrap()
    }

    pub fn remove_module(&mut self, module: ModuleToken) {
        let module = self.get_module(module);
        if module.is_none() {
            return;
        }
        let module = module.unwrap().token();

        if !self.module_children[module].is_empty() {
            for child in self.module_children[module].clone() {
                self.remove_module(child);
            }
        }

        // Update hierarchy.
        if let Some(parent) = self.module_parents[module] {
            self.module_children[parent].remove(&module);
        }
        self.modules_by_name.remove_by_right(&module);
        self.modules.remove(module);
        self.module_parents.remove(module);
        self.module_children.remove(module);

        // Update imports.
        for imported in self.modules_directly_imported_by(module).clone() {
            self.remove_import(module, imported);
        }
        for importer in self.modules_that_directly_import(module).clone() {
            self.remove_import(importer, module);
        }
        self.imports.remove(module);
        self.reverse_imports.remove(module);
    }

    pub fn add_import(&mut self, importer: ModuleToken, imported: ModuleToken) {
        self.imports
            .entry(importer)
            .unwrap()
            .or_default()
            .insert(imported);
        self.reverse_imports
            .entry(imported)
            .unwrap()
            .or_default()
            .insert(importer);
    }

    pub fn add_detailed_import(
        &mut self,
        importer: ModuleToken,
        imported: ModuleToken,
        line_number: u32,
        line_contents: &str,
    ) {
        self.imports
            .entry(importer)
            .unwrap()
            .or_default()
            .insert(imported);
        self.reverse_imports
            .entry(imported)
            .unwrap()
            .or_default()
            .insert(importer);
        {
            let mut interner = IMPORT_LINE_CONTENTS.write().unwrap();
            let line_contents = interner.get_or_intern(line_contents);
            self.import_details
                .entry((importer, imported))
                .or_default()
                .insert(ImportDetails::new(line_number, line_contents));
        }
    }

    pub fn remove_import(&mut self, importer: ModuleToken, imported: ModuleToken) {
        match self.imports.entry(importer).unwrap() {
            Entry::Occupied(mut entry) => {
                entry.get_mut().remove(&imported);
            }
            Entry::Vacant(_) => {}
        };
        match self.reverse_imports.entry(imported).unwrap() {
            Entry::Occupied(mut entry) => {
                entry.get_mut().remove(&importer);
            }
            Entry::Vacant(_) => {}
        };
        self.import_details.remove(&(importer, imported));
    }
}

fn parent_name(name: &str) -> Option<String> {
    name.rsplit_once(".").map(|(base, _)| base.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_add_module_materializes_ancestors() {
        let mut graph = Graph::default();
        graph.get_or_add_module("foo.bar");

        assert!(graph.get_module_by_name("foo").unwrap().is_invisible());
        assert!(!graph.get_module_by_name("foo.bar").unwrap().is_invisible());

        graph.get_or_add_module("foo");
        assert!(!graph.get_module_by_name("foo").unwrap().is_invisible());
    }

    #[test]
    fn test_remove_module_removes_subtree_and_imports() {
        let mut graph = Graph::default();
        let foo = graph.get_or_add_module("foo").token();
        let foo_bar = graph.get_or_add_module("foo.bar").token();
        let baz = graph.get_or_add_module("baz").token();
        graph.add_import(foo_bar, baz);

        graph.remove_module(foo);

        assert!(graph.get_module_by_name("foo").is_none());
        assert!(graph.get_module_by_name("foo.bar").is_none());
        assert!(graph.modules_that_directly_import(baz).is_empty());
    }

    #[test]
    fn test_add_and_remove_import() {
        let mut graph = Graph::default();
        let foo = graph.get_or_add_module("foo").token();
        let bar = graph.get_or_add_module("bar").token();

        graph.add_import(foo, bar);
        assert!(graph.direct_import_exists(foo, bar, false).unwrap());

        graph.remove_import(foo, bar);
        assert!(!graph.direct_import_exists(foo, bar, false).unwrap());
    }

    #[test]
    fn test_add_detailed_import_records_details() {
        let mut graph = Graph::default();
        let foo = graph.get_or_add_module("foo").token();
        let bar = graph.get_or_add_module("bar").token();

        graph.add_detailed_import(foo, bar, 3, "import bar");

        let details = graph.get_import_details(foo, bar);
        assert_eq!(details.len(), 1);
        let detail = details.iter().next().unwrap();
        assert_eq!(detail.line_number(), 3);
        assert_eq!(detail.line_contents(), "import bar");
    }
}
