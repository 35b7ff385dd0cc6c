// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

/// A mapping from a type to its single shared instance.
///
/// The first [`get_or_create`][SingletonRegistry::get_or_create] call for a
/// type constructs the instance; every later call returns the stored one and
/// ignores its initializer. The registry is an explicit value rather than
/// ambient global state: applications typically keep one in a `static`, and
/// tests can hold their own.
///
/// # Examples
///
/// ```rust
/// use hannah::SingletonRegistry;
///
/// #[derive(Debug)]
/// struct Config {
///     verbose: bool,
/// }
///
/// let registry = SingletonRegistry::new();
/// let first = registry.get_or_create(|| Config { verbose: true });
/// let second = registry.get_or_create(|| Config { verbose: false });
/// assert!(second.verbose);
/// ```
#[derive(Debug, Default)]
pub struct SingletonRegistry {
    instances: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl SingletonRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared `T`, constructing it with `init` on first access.
    ///
    /// One mutex serializes lookup and construction, so under concurrent
    /// first access exactly one initializer runs. The initializer must not
    /// call back into the same registry.
    pub fn get_or_create<T, F>(&self, init: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let instance = instances
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(init()))
            .clone();
        drop(instances);

        match instance.downcast::<T>() {
            Ok(instance) => instance,
            // The map is keyed by TypeId::of::<T>().
            Err(_) => unreachable!("registry entry stored under a mismatched type"),
        }
    }

    /// Drop the stored `T`, so the next access constructs a fresh instance.
    ///
    /// Instances handed out earlier stay alive through their own `Arc`s.
    pub fn reset<T: Any + Send + Sync>(&self) {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        instances.remove(&TypeId::of::<T>());
    }
}
