//! Function frame.

use tir_ir::{
    AttrValue, Attrs, Buffer, BufferMap, EnvThreads, IterVar, PrimFunc, Stmt, Type, Var,
};

use super::{as_stmt, insert_entry, set_once, Finalized, FrameTag, MetadataGuard};
use crate::BuilderError;

/// Lexical scope of one tensor function.
///
/// On exit the accumulated statements become the function body, wrapped in
/// one allocation scope per root buffer (first declared outermost), and the
/// [`PrimFunc`] is handed to the module under [`name`](Self::name).
#[derive(Clone, Debug, Default)]
pub struct PrimFuncFrame {
    name: Option<String>,
    args: Vec<Var>,
    ret_type: Option<Type>,
    buffer_map: BufferMap,
    preflattened_buffer_map: BufferMap,
    attrs: Option<Attrs>,
    env_threads: EnvThreads,
    root_alloc_buffers: Vec<Buffer>,
    pub(super) guard: MetadataGuard,
}

impl PrimFuncFrame {
    /// An anonymous function; the module picks its name.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    // Metadata

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), BuilderError> {
        set_once(
            &mut self.name,
            name.into(),
            &mut self.guard,
            FrameTag::PrimFunc,
            "name",
        )
    }

    /// Append a formal parameter.
    pub fn add_arg(&mut self, var: Var) {
        self.args.push(var);
    }

    /// Append a parameter and map it to `buffer`.
    pub fn add_buffer_arg(&mut self, var: Var, buffer: Buffer) -> Result<(), BuilderError> {
        self.bind_buffer(var.clone(), buffer)?;
        self.args.push(var);
        Ok(())
    }

    pub fn set_ret_type(&mut self, ret_type: Type) -> Result<(), BuilderError> {
        set_once(
            &mut self.ret_type,
            ret_type,
            &mut self.guard,
            FrameTag::PrimFunc,
            "ret_type",
        )
    }

    pub fn bind_buffer(&mut self, var: Var, buffer: Buffer) -> Result<(), BuilderError> {
        let key_name = var.name.clone();
        insert_entry(
            &mut self.buffer_map,
            var,
            buffer,
            &mut self.guard,
            FrameTag::PrimFunc,
            "buffer_map",
            &key_name,
        )
    }

    pub fn bind_preflattened_buffer(&mut self, var: Var, buffer: Buffer) -> Result<(), BuilderError> {
        let key_name = var.name.clone();
        insert_entry(
            &mut self.preflattened_buffer_map,
            var,
            buffer,
            &mut self.guard,
            FrameTag::PrimFunc,
            "preflattened_buffer_map",
            &key_name,
        )
    }

    pub fn set_attr(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), BuilderError> {
        let key = key.into();
        let key_name = key.clone();
        insert_entry(
            self.attrs.get_or_insert_with(Attrs::default),
            key,
            value.into(),
            &mut self.guard,
            FrameTag::PrimFunc,
            "attrs",
            &key_name,
        )
    }

    /// Bind `var` to a thread-environment iteration variable.
    pub fn bind_env_thread(&mut self, var: Var, iter_var: IterVar) -> Result<(), BuilderError> {
        let key_name = var.name.clone();
        insert_entry(
            &mut self.env_threads,
            var,
            iter_var,
            &mut self.guard,
            FrameTag::PrimFunc,
            "env_threads",
            &key_name,
        )
    }

    /// Allocate `buffer` for the whole function body.
    pub fn alloc_root_buffer(&mut self, buffer: Buffer) {
        self.root_alloc_buffers.push(buffer);
    }

    // Accessors

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn args(&self) -> &[Var] {
        &self.args
    }

    pub fn ret_type(&self) -> Option<&Type> {
        self.ret_type.as_ref()
    }

    pub fn buffer_map(&self) -> &BufferMap {
        &self.buffer_map
    }

    pub fn preflattened_buffer_map(&self) -> &BufferMap {
        &self.preflattened_buffer_map
    }

    pub fn attrs(&self) -> Option<&Attrs> {
        self.attrs.as_ref()
    }

    pub fn env_threads(&self) -> &EnvThreads {
        &self.env_threads
    }

    pub fn root_alloc_buffers(&self) -> &[Buffer] {
        &self.root_alloc_buffers
    }

    // Finalization

    pub(super) fn finalize(self, stmts: Vec<Stmt>) -> Result<Finalized, BuilderError> {
        let Self {
            name,
            args,
            ret_type,
            buffer_map,
            preflattened_buffer_map,
            attrs,
            env_threads,
            root_alloc_buffers,
            guard: _,
        } = self;

        let mut body = as_stmt(stmts);
        for buffer in root_alloc_buffers.into_iter().rev() {
            body = Stmt::alloc_buffer(buffer, body);
        }

        let func = PrimFunc::new(args, body)?
            .with_ret_type(ret_type.unwrap_or_default())
            .with_buffer_map(buffer_map)
            .with_preflattened_buffer_map(preflattened_buffer_map)
            .with_attrs(attrs.unwrap_or_default())
            .with_env_threads(env_threads);

        Ok(Finalized::Function { name, func })
    }
}
