//! Deterministic in-memory stand-in for an FTP server.
//!
//! Exposes a fixed tree through the engine's `RemoteClient` seam, with
//! scripted failures so tests can exercise retry, misclassification, and
//! cursor-restore behavior without a network.

use std::collections::HashMap;

use sluice_engine::{MirrorError, RemoteClient};

#[derive(Debug, Clone)]
pub enum Node {
    File(Vec<u8>),
    Dir(Vec<(String, Node)>),
}

impl Node {
    pub fn dir(children: Vec<(&str, Node)>) -> Node {
        Node::Dir(
            children
                .into_iter()
                .map(|(name, node)| (name.to_owned(), node))
                .collect(),
        )
    }

    pub fn file(content: &[u8]) -> Node {
        Node::File(content.to_vec())
    }
}

pub struct FakeClient {
    root: Node,
    cwd: Vec<String>,
    /// Every remote operation in call order, e.g. `cwd /data`, `retr a.txt`.
    pub op_log: Vec<String>,
    /// Names listed as plain files even though the node is a directory.
    pub misclassified: Vec<String>,
    /// Raw lines appended to every listing (e.g. `total 3`, malformed noise).
    pub extra_listing_lines: Vec<String>,
    /// name -> number of retrieve attempts that fail transiently first.
    pub transient_retr_failures: HashMap<String, u32>,
    /// Absolute dir path -> number of list attempts that fail transiently.
    pub transient_list_failures: HashMap<String, u32>,
    /// When set, every SIZE query is rejected.
    pub fail_size: bool,
    pub retr_attempts: HashMap<String, u32>,
}

impl FakeClient {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            cwd: Vec::new(),
            op_log: Vec::new(),
            misclassified: Vec::new(),
            extra_listing_lines: Vec::new(),
            transient_retr_failures: HashMap::new(),
            transient_list_failures: HashMap::new(),
            fail_size: false,
            retr_attempts: HashMap::new(),
        }
    }

    pub fn cwd_path(&self) -> String {
        format!("/{}", self.cwd.join("/"))
    }

    fn transient(reason: &str) -> MirrorError {
        MirrorError::Transient {
            status: 450,
            reason: reason.to_owned(),
        }
    }

    fn rejected(reason: &str) -> MirrorError {
        MirrorError::Rejected {
            status: 550,
            reason: reason.to_owned(),
        }
    }

    fn node_at<'a>(root: &'a Node, path: &[String]) -> Option<&'a Node> {
        let mut node = root;
        for segment in path {
            match node {
                Node::Dir(children) => {
                    node = children
                        .iter()
                        .find(|(name, _)| name == segment)
                        .map(|(_, child)| child)?;
                }
                Node::File(_) => return None,
            }
        }
        Some(node)
    }

    fn current_dir(&self) -> &Node {
        Self::node_at(&self.root, &self.cwd).expect("cwd points at a live node")
    }

    fn child(&self, name: &str) -> Option<&Node> {
        match self.current_dir() {
            Node::Dir(children) => children
                .iter()
                .find(|(child, _)| child == name)
                .map(|(_, node)| node),
            Node::File(_) => None,
        }
    }
}

impl RemoteClient for FakeClient {
    fn change_dir(&mut self, path: &str) -> Result<(), MirrorError> {
        self.op_log.push(format!("cwd {path}"));
        let target: Vec<String> = if let Some(absolute) = path.strip_prefix('/') {
            absolute
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        } else {
            let mut resolved = self.cwd.clone();
            resolved.extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_owned));
            resolved
        };
        match Self::node_at(&self.root, &target) {
            Some(Node::Dir(_)) => {
                self.cwd = target;
                Ok(())
            }
            _ => Err(Self::rejected("no such directory")),
        }
    }

    fn change_dir_up(&mut self) -> Result<(), MirrorError> {
        self.op_log.push("cdup".to_owned());
        self.cwd.pop();
        Ok(())
    }

    fn list_current_dir(&mut self) -> Result<Vec<String>, MirrorError> {
        let here = self.cwd_path();
        self.op_log.push(format!("list {here}"));
        if let Some(remaining) = self.transient_list_failures.get_mut(&here)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(Self::transient("server busy"));
        }

        let Node::Dir(children) = self.current_dir() else {
            return Err(Self::rejected("not a directory"));
        };
        let mut lines: Vec<String> = children
            .iter()
            .map(|(name, node)| {
                let as_file = self.misclassified.iter().any(|m| m == name);
                match node {
                    Node::Dir(_) if !as_file => {
                        format!("drwxr-xr-x   2 ftp ftp      4096 Jan 01 12:00 {name}")
                    }
                    Node::Dir(_) => {
                        format!("-rw-r--r--   1 ftp ftp      4096 Jan 01 12:00 {name}")
                    }
                    Node::File(content) => {
                        let size = content.len();
                        format!("-rw-r--r--   1 ftp ftp {size:9} Jan 01 12:00 {name}")
                    }
                }
            })
            .collect();
        lines.extend(self.extra_listing_lines.iter().cloned());
        Ok(lines)
    }

    fn file_size(&mut self, name: &str) -> Result<u64, MirrorError> {
        self.op_log.push(format!("size {name}"));
        if self.fail_size {
            return Err(Self::rejected("SIZE not supported"));
        }
        match self.child(name) {
            Some(Node::File(content)) => Ok(content.len() as u64),
            _ => Err(Self::rejected("not a plain file")),
        }
    }

    fn retrieve(
        &mut self,
        name: &str,
        sink: &mut dyn FnMut(&[u8]) -> Result<(), MirrorError>,
    ) -> Result<u64, MirrorError> {
        self.op_log.push(format!("retr {name}"));
        *self.retr_attempts.entry(name.to_owned()).or_insert(0) += 1;

        let content = match self.child(name) {
            Some(Node::File(content)) => content.clone(),
            Some(Node::Dir(_)) => return Err(Self::rejected("not a plain file")),
            None => return Err(Self::rejected("no such file")),
        };

        if let Some(remaining) = self.transient_retr_failures.get_mut(name)
            && *remaining > 0
        {
            *remaining -= 1;
            // Deliver part of the payload before dying so retries that do
            // not restart from scratch would corrupt the local file.
            let partial = &content[..content.len() / 2];
            if !partial.is_empty() {
                sink(partial)?;
            }
            return Err(Self::transient("transfer aborted"));
        }

        for chunk in content.chunks(4) {
            sink(chunk)?;
        }
        Ok(content.len() as u64)
    }
}
