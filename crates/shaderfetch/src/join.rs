use crate::ShaderStage;

/// Vertex and fragment program text, ready for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Collects independently loaded stages until both are present.
#[derive(Debug, Clone, Default)]
pub struct SourceJoin {
    vertex: Option<String>,
    fragment: Option<String>,
}

impl SourceJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a loaded stage. Returns the pair once the other stage has also
    /// arrived, leaving the join empty again.
    pub fn accept(&mut self, stage: ShaderStage, text: String) -> Option<ShaderSources> {
        match stage {
            ShaderStage::Vertex => self.vertex = Some(text),
            ShaderStage::Fragment => self.fragment = Some(text),
        }
        if self.vertex.is_some() && self.fragment.is_some() {
            let vertex = self.vertex.take()?;
            let fragment = self.fragment.take()?;
            Some(ShaderSources { vertex, fragment })
        } else {
            None
        }
    }

    /// Stages that have not reported yet.
    pub fn pending(&self) -> Vec<ShaderStage> {
        let mut pending = Vec::with_capacity(2);
        if self.vertex.is_none() {
            pending.push(ShaderStage::Vertex);
        }
        if self.fragment.is_none() {
            pending.push(ShaderStage::Fragment);
        }
        pending
    }
}
