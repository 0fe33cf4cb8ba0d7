use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{error::EvaluationError, interpreter::Value};

/// One level of lexical scope. Frames are always shared through [Rc] so that
/// closures and running calls see each other's definitions; a frame is never
/// copied.
#[derive(Debug, Default)]
pub struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn with_bindings(bindings: HashMap<String, Value>) -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::new(bindings), parent: None })
    }

    pub fn child(parent: &Rc<Frame>) -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::new(HashMap::new()), parent: Some(Rc::clone(parent)) })
    }

    pub fn parent(&self) -> Option<&Rc<Frame>> {
        self.parent.as_ref()
    }

    /// Binds `name` in this frame only, replacing any previous binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Result<Value, EvaluationError> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone())
        }
        match &self.parent {
            Some(parent) => parent.lookup(name),
            None => Err(EvaluationError::UndefinedName(name.to_owned())),
        }
    }

    /// Rebinds the nearest existing binding of `name`, walking outwards.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EvaluationError> {
        if let Some(slot) = self.bindings.borrow_mut().get_mut(name) {
            *slot = value;
            return Ok(())
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(EvaluationError::UndefinedName(name.to_owned())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }
}
