//! Tool handlers
//!
//! Each handler validates its arguments, then either runs an operation
//! through the operations script, talks to the engine directly, or drives
//! the process supervisor. Validation failures never reach the engine.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use gdbridge_config::Config;
use gdbridge_godot::executor::{ERROR_MARKER, FAILURE_MARKER};
use gdbridge_godot::project::{find_projects, project_name, project_structure};
use gdbridge_godot::version::{probe_version, require_uid_support};
use gdbridge_godot::{OperationExecutor, OperationOutput, PathResolver, ResolverOptions};
use gdbridge_runner::{CommandSpec, NativeRunner, ProcessRunner, ProcessSupervisor};
use gdbridge_utils::BridgeError;
use gdbridge_utils::error::{FileKind, RequestError, RunnerError};
use gdbridge_utils::paths::{is_godot_project, is_safe_request_path, project_file};

use super::args::{Params, ToolArgs};
use super::response::{
    EXECUTION_SUGGESTIONS, SCENE_BUILDER_EXECUTION_SUGGESTIONS, ToolFailure, ToolResponse,
    ToolResult, pretty,
};
use super::tools::Tool;

const UNSAFE_PATHS_HINT: &str =
    "Provide valid paths without \"..\" or other potentially unsafe characters";
const PROJECT_PATH_HINT: &str = "Provide a valid path to a Godot project directory";
const NOT_A_PROJECT_HINT: &str =
    "Ensure the path points to a directory containing a project.godot file";
const DEFAULT_ROOT_NODE_TYPE: &str = "Node2D";

/// Shared state behind every tool call.
pub struct Bridge {
    runner: Arc<dyn ProcessRunner>,
    resolver: PathResolver,
    executor: OperationExecutor,
    supervisor: ProcessSupervisor,
    default_project: Option<PathBuf>,
    version_timeout: Duration,
}

impl Bridge {
    /// Wire the bridge from `config`, using `runner` for one-shot commands.
    ///
    /// `options` supplies what configuration does not: `GODOT_PATH`, the
    /// platform, and the home directory.
    pub fn new(config: &Config, runner: Arc<dyn ProcessRunner>, options: ResolverOptions) -> Self {
        let options = ResolverOptions {
            configured_path: config.godot_path().map(str::to_string),
            strict: config.strict_path_validation(),
            probe_timeout: config.version_timeout(),
            ..options
        };

        Self {
            resolver: PathResolver::new(Arc::clone(&runner), options),
            executor: OperationExecutor::new(
                Arc::clone(&runner),
                config.operations_script(),
                config.debug_flag(),
                config.operation_timeout(),
            ),
            supervisor: ProcessSupervisor::new(config.output_max_lines()),
            default_project: config.default_project_path().cloned(),
            version_timeout: config.version_timeout(),
            runner,
        }
    }

    /// Production wiring: native processes and `GODOT_PATH` from the environment.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(NativeRunner::new()),
            ResolverOptions::from_env(),
        )
    }

    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    #[must_use]
    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    /// Kill the supervised process, if any.
    pub fn shutdown(&self) {
        self.supervisor.shutdown();
    }

    /// Run `tool` with raw `arguments` and render the outcome.
    pub async fn call_tool(&self, tool: Tool, arguments: &Value) -> ToolResponse {
        let args = ToolArgs::normalize(arguments);
        debug!(tool = tool.name(), "handling tool call");

        let result = match tool {
            Tool::LaunchEditor => self.launch_editor(&args).await,
            Tool::RunProject => self.run_project(&args).await,
            Tool::GetDebugOutput => self.get_debug_output(),
            Tool::StopProject => self.stop_project(),
            Tool::GetGodotVersion => self.get_godot_version().await,
            Tool::ListProjects => list_projects(&args).await,
            Tool::GetProjectInfo => self.get_project_info(&args).await,
            Tool::CreateScene => self.create_scene(&args).await,
            Tool::AddNode => self.add_node(&args).await,
            Tool::LoadSprite => self.load_sprite(&args).await,
            Tool::ExportMeshLibrary => self.export_mesh_library(&args).await,
            Tool::SaveScene => self.save_scene(&args).await,
            Tool::GetUid => self.get_uid(&args).await,
            Tool::UpdateProjectUids => self.update_project_uids(&args).await,
            Tool::ListSceneBuilderCollections => self.list_scene_builder_collections(&args).await,
            Tool::ListSceneBuilderItems => self.list_scene_builder_items(&args).await,
            Tool::GetSceneBuilderItem => self.get_scene_builder_item(&args).await,
            Tool::CreateSceneBuilderItem => self.create_scene_builder_item(&args).await,
            Tool::PlaceSceneBuilderItem => self.place_scene_builder_item(&args).await,
            Tool::PlaceSceneBuilderItemsBatch => {
                self.place_scene_builder_items_batch(&args).await
            }
        };

        result.unwrap_or_else(ToolResponse::from)
    }

    // ------------------------------------------------------------------
    // Engine process
    // ------------------------------------------------------------------

    async fn launch_editor(&self, args: &ToolArgs) -> ToolResult {
        let project = args.str("projectPath").ok_or_else(project_required)?;
        check_project_path(project)?;
        let godot = self.godot_path().await?;
        let root = require_project(project)?;

        info!(project, "launching Godot editor");
        let spec = CommandSpec::new(&godot).args(["-e", "--path"]).arg(&root);
        self.runner.spawn_detached(&spec).await.map_err(|e| {
            ToolFailure::wrap("Failed to launch Godot editor", &e, EXECUTION_SUGGESTIONS)
        })?;

        Ok(ToolResponse::text(format!(
            "Godot editor launched successfully for project at {project}."
        )))
    }

    async fn run_project(&self, args: &ToolArgs) -> ToolResult {
        let project = args.str("projectPath").ok_or_else(project_required)?;
        check_project_path(project)?;
        let root = require_project(project)?;

        let scene = args.str("scene");
        if let Some(scene) = scene
            && !is_safe_request_path(scene)
        {
            return Err(RequestError::unsafe_path("Invalid scene path").into());
        }

        let godot = self.godot_path().await?;
        let mut spec = CommandSpec::new(&godot).args(["-d", "--path"]).arg(&root);
        if let Some(scene) = scene {
            debug!(scene, "adding scene argument");
            spec = spec.arg(scene);
        }

        info!(project, "running Godot project");
        self.supervisor.start(&spec).map_err(|e| {
            ToolFailure::wrap("Failed to run Godot project", &e, EXECUTION_SUGGESTIONS)
        })?;

        Ok(ToolResponse::text(
            "Godot project started in debug mode. Use get_debug_output to see output.",
        ))
    }

    fn get_debug_output(&self) -> ToolResult {
        let logs = self.supervisor.query()?;
        Ok(ToolResponse::json(&json!({
            "output": logs.output,
            "errors": logs.errors,
        })))
    }

    fn stop_project(&self) -> ToolResult {
        let logs = self.supervisor.stop().map_err(|e| match e {
            RunnerError::NoActiveProcess => ToolFailure::new(
                "No active Godot process to stop.",
                &[
                    "Use run_project to start a Godot project first",
                    "The process may have already terminated",
                ],
            ),
            other => other.into(),
        })?;

        Ok(ToolResponse::json(&json!({
            "message": "Godot project stopped",
            "finalOutput": logs.output,
            "finalErrors": logs.errors,
        })))
    }

    async fn get_godot_version(&self) -> ToolResult {
        let godot = self.godot_path().await?;
        let version = probe_version(self.runner.as_ref(), &godot, self.version_timeout).await?;
        Ok(ToolResponse::text(version))
    }

    async fn get_project_info(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to get project info";

        let project = args.str("projectPath").ok_or_else(project_required)?;
        check_project_path(project)?;
        let godot = self.godot_path().await?;
        let root = require_project(project)?;

        let version = probe_version(self.runner.as_ref(), &godot, self.version_timeout)
            .await
            .map_err(|e| ToolFailure::wrap(ACTION, &e, EXECUTION_SUGGESTIONS))?;

        let scan_root = root.clone();
        let structure = tokio::task::spawn_blocking(move || project_structure(&scan_root))
            .await
            .map_err(|e| ToolFailure::new(format!("{ACTION}: {e}"), EXECUTION_SUGGESTIONS))?
            .map_err(|e| {
                ToolFailure::wrap(ACTION, &BridgeError::from(e), EXECUTION_SUGGESTIONS)
            })?;

        Ok(ToolResponse::json(&json!({
            "name": project_name(&root),
            "path": project,
            "godotVersion": version,
            "structure": structure,
        })))
    }

    // ------------------------------------------------------------------
    // Scene operations
    // ------------------------------------------------------------------

    async fn create_scene(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to create scene";

        let (Some(project), Some(scene)) = (args.str("projectPath"), args.str("scenePath")) else {
            return Err(RequestError::missing(
                "Project path and scene path are required",
                "Provide valid paths for both the project and the scene",
            )
            .into());
        };
        check_paths(&[project, scene])?;
        let root = require_project(project)?;

        let params = Params::new()
            .with("scenePath", scene)
            .with(
                "rootNodeType",
                args.str("rootNodeType").unwrap_or(DEFAULT_ROOT_NODE_TYPE),
            )
            .into_value();
        let output = self.run_operation("create_scene", &params, &root, ACTION).await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the root node type is valid",
                "Ensure you have write permissions to the scene path",
                "Verify the scene path is valid",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "Scene created successfully at: {scene}\n\nOutput: {}",
            output.stdout
        )))
    }

    async fn add_node(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to add node";

        let (Some(project), Some(scene), Some(node_type), Some(node_name)) = (
            args.str("projectPath"),
            args.str("scenePath"),
            args.str("nodeType"),
            args.str("nodeName"),
        ) else {
            return Err(RequestError::missing(
                "Missing required parameters",
                "Provide projectPath, scenePath, nodeType, and nodeName",
            )
            .into());
        };
        check_paths(&[project, scene])?;
        let root = require_project(project)?;
        require_file(&root, scene, FileKind::Scene)?;

        let params = Params::new()
            .with("scenePath", scene)
            .with("nodeType", node_type)
            .with("nodeName", node_name)
            .copy_truthy(args, "parentNodePath")
            .copy_truthy(args, "properties")
            .into_value();
        let output = self.run_operation("add_node", &params, &root, ACTION).await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the node type is valid",
                "Ensure the parent node path exists",
                "Verify the scene file is valid",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "Node '{node_name}' of type '{node_type}' added successfully to '{scene}'.\n\nOutput: {}",
            output.stdout
        )))
    }

    async fn load_sprite(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to load sprite";

        let (Some(project), Some(scene), Some(node), Some(texture)) = (
            args.str("projectPath"),
            args.str("scenePath"),
            args.str("nodePath"),
            args.str("texturePath"),
        ) else {
            return Err(RequestError::missing(
                "Missing required parameters",
                "Provide projectPath, scenePath, nodePath, and texturePath",
            )
            .into());
        };
        check_paths(&[project, scene, node, texture])?;
        let root = require_project(project)?;
        require_file(&root, scene, FileKind::Scene)?;
        require_file(&root, texture, FileKind::Texture)?;

        let params = Params::new()
            .with("scenePath", scene)
            .with("nodePath", node)
            .with("texturePath", texture)
            .into_value();
        let output = self.run_operation("load_sprite", &params, &root, ACTION).await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the node path is correct",
                "Ensure the node is a Sprite2D, Sprite3D, or TextureRect",
                "Verify the texture file is a valid image format",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "Sprite loaded successfully with texture: {texture}\n\nOutput: {}",
            output.stdout
        )))
    }

    async fn export_mesh_library(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to export mesh library";

        let (Some(project), Some(scene), Some(output_path)) = (
            args.str("projectPath"),
            args.str("scenePath"),
            args.str("outputPath"),
        ) else {
            return Err(RequestError::missing(
                "Missing required parameters",
                "Provide projectPath, scenePath, and outputPath",
            )
            .into());
        };
        check_paths(&[project, scene, output_path])?;
        let root = require_project(project)?;
        require_file(&root, scene, FileKind::Scene)?;

        let mut params = Params::new()
            .with("scenePath", scene)
            .with("outputPath", output_path);
        if let Some(names) = args.present("meshItemNames").filter(|v| v.is_array()) {
            params = params.with("meshItemNames", names.clone());
        }
        let output = self
            .run_operation("export_mesh_library", &params.into_value(), &root, ACTION)
            .await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the scene contains valid 3D meshes",
                "Ensure the output path is valid",
                "Verify the scene file is valid",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "MeshLibrary exported successfully to: {output_path}\n\nOutput: {}",
            output.stdout
        )))
    }

    async fn save_scene(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to save scene";

        let (Some(project), Some(scene)) = (args.str("projectPath"), args.str("scenePath")) else {
            return Err(RequestError::missing(
                "Missing required parameters",
                "Provide projectPath and scenePath",
            )
            .into());
        };
        check_paths(&[project, scene])?;
        let new_path = args.str("newPath");
        if let Some(new_path) = new_path
            && !is_safe_request_path(new_path)
        {
            return Err(ToolFailure::new(
                "Invalid new path",
                &["Provide a valid new path without \"..\" or other potentially unsafe characters"],
            ));
        }
        let root = require_project(project)?;
        require_file(&root, scene, FileKind::Scene)?;

        let mut params = Params::new().with("scenePath", scene);
        if let Some(new_path) = new_path {
            params = params.with("newPath", new_path);
        }
        let output = self
            .run_operation("save_scene", &params.into_value(), &root, ACTION)
            .await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the scene file is valid",
                "Ensure you have write permissions to the output path",
                "Verify the scene can be properly packed",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "Scene saved successfully to: {}\n\nOutput: {}",
            new_path.unwrap_or(scene),
            output.stdout
        )))
    }

    async fn get_uid(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to get UID";

        let (Some(project), Some(file)) = (args.str("projectPath"), args.str("filePath")) else {
            return Err(RequestError::missing(
                "Missing required parameters",
                "Provide projectPath and filePath",
            )
            .into());
        };
        check_paths(&[project, file])?;
        let godot = self.godot_path().await?;
        let root = require_project(project)?;
        require_file(&root, file, FileKind::File)?;
        self.require_uid_capable(&godot, ACTION).await?;

        let params = Params::new().with("filePath", file).into_value();
        let output = self.run_operation("get_uid", &params, &root, ACTION).await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the file is a valid Godot resource",
                "Ensure the file path is correct",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "UID for {file}: {}",
            output.stdout.trim()
        )))
    }

    async fn update_project_uids(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to update project UIDs";

        let project = args.str("projectPath").ok_or_else(project_required)?;
        check_project_path(project)?;
        let godot = self.godot_path().await?;
        let root = require_project(project)?;
        self.require_uid_capable(&godot, ACTION).await?;

        let params = Params::new().with("projectPath", project).into_value();
        let output = self
            .run_operation("resave_resources", &params, &root, ACTION)
            .await?;
        core_failure(
            &output,
            ACTION,
            &[
                "Check if the project is valid",
                "Ensure you have write permissions to the project directory",
            ],
        )?;

        Ok(ToolResponse::text(format!(
            "Project UIDs updated successfully.\n\nOutput: {}",
            output.stdout
        )))
    }

    // ------------------------------------------------------------------
    // Scene builder
    // ------------------------------------------------------------------

    async fn list_scene_builder_collections(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to list collections";

        let project = self.scene_builder_project(args)?;
        check_project_path(&project)?;
        let root = require_scene_builder_project(&project)?;

        let params = Params::new().copy_truthy(args, "rootDir").into_value();
        let output = self
            .run_scene_builder_operation("list_collections", &params, &root, ACTION)
            .await?;
        scene_builder_failure(
            &output,
            ACTION,
            &["Check if the SceneBuilder data directory exists"],
        )?;
        scene_builder_response(&output.stdout, None, ACTION)
    }

    async fn list_scene_builder_items(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to list items";

        let project = self.scene_builder_project(args)?;
        let collection = args.str("collectionName").ok_or_else(|| {
            ToolFailure::from(RequestError::missing(
                "Collection name is required",
                "Provide collectionName",
            ))
        })?;
        check_project_path(&project)?;
        let root = require_scene_builder_project(&project)?;

        let params = Params::new()
            .with("collectionName", collection)
            .copy_truthy(args, "rootDir")
            .into_value();
        let output = self
            .run_scene_builder_operation("list_collection_items", &params, &root, ACTION)
            .await?;
        scene_builder_failure(&output, ACTION, &["Check if the collection exists"])?;
        scene_builder_response(&output.stdout, None, ACTION)
    }

    async fn get_scene_builder_item(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to get item info";

        let project = self.scene_builder_project(args)?;
        let (Some(collection), Some(item)) = (args.str("collectionName"), args.str("itemName"))
        else {
            return Err(RequestError::missing(
                "Collection name and item name are required",
                "Provide collectionName and itemName",
            )
            .into());
        };
        check_project_path(&project)?;
        let root = require_scene_builder_project(&project)?;

        let params = Params::new()
            .with("collectionName", collection)
            .with("itemName", item)
            .copy_truthy(args, "rootDir")
            .into_value();
        let output = self
            .run_scene_builder_operation("get_item_info", &params, &root, ACTION)
            .await?;
        scene_builder_failure(&output, ACTION, &["Check if the item exists"])?;
        scene_builder_response(&output.stdout, None, ACTION)
    }

    async fn create_scene_builder_item(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to create item";
        const OPTIONAL: &[&str] = &[
            "useRandomVerticalOffset",
            "useRandomRotation",
            "useRandomScale",
            "randomOffsetYMin",
            "randomOffsetYMax",
            "randomRotX",
            "randomRotY",
            "randomRotZ",
            "randomScaleMin",
            "randomScaleMax",
        ];

        let project = self.scene_builder_project(args)?;
        let (Some(collection), Some(scene)) = (args.str("collectionName"), args.str("scenePath"))
        else {
            return Err(RequestError::missing(
                "Collection name and scene path are required",
                "Provide collectionName and scenePath",
            )
            .into());
        };
        check_paths(&[project.as_str(), scene])?;
        let root = require_scene_builder_project(&project)?;
        require_file(&root, scene, FileKind::Scene)?;

        let mut params = Params::new()
            .with("collectionName", collection)
            .with("scenePath", scene)
            .copy_truthy(args, "itemName")
            .copy_truthy(args, "rootDir");
        for key in OPTIONAL {
            params = params.copy_present(args, key);
        }
        let output = self
            .run_scene_builder_operation(
                "create_scene_builder_item",
                &params.into_value(),
                &root,
                ACTION,
            )
            .await?;
        scene_builder_failure(&output, ACTION, &["Check if the scene file exists and is valid"])?;
        scene_builder_response(
            &output.stdout,
            Some("SceneBuilder item created successfully."),
            ACTION,
        )
    }

    async fn place_scene_builder_item(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to place item";

        let project = self.scene_builder_project(args)?;
        let (Some(target), Some(collection), Some(item)) = (
            args.str("targetScene"),
            args.str("collectionName"),
            args.str("itemName"),
        ) else {
            return Err(RequestError::missing(
                "Target scene, collection name, and item name are required",
                "Provide targetScene, collectionName, and itemName",
            )
            .into());
        };
        check_paths(&[project.as_str(), target])?;
        let root = require_scene_builder_project(&project)?;
        require_file(&root, target, FileKind::TargetScene)?;

        let params = Params::new()
            .with("targetScene", target)
            .with("collectionName", collection)
            .with("itemName", item)
            .copy_truthy(args, "position")
            .copy_truthy(args, "rotation")
            .copy_truthy(args, "scale")
            .copy_truthy(args, "parentPath")
            .copy_truthy(args, "instanceName")
            .copy_present(args, "applyRandomTransform")
            .into_value();
        let output = self
            .run_scene_builder_operation("place_item", &params, &root, ACTION)
            .await?;
        scene_builder_failure(
            &output,
            ACTION,
            &["Check if the item exists", "Verify the target scene is valid"],
        )?;
        scene_builder_response(&output.stdout, Some("Item placed successfully."), ACTION)
    }

    async fn place_scene_builder_items_batch(&self, args: &ToolArgs) -> ToolResult {
        const ACTION: &str = "Failed to place items";

        let project = self.scene_builder_project(args)?;
        let (Some(target), Some(placements)) = (args.str("targetScene"), args.truthy("placements"))
        else {
            return Err(RequestError::missing(
                "Target scene and placements are required",
                "Provide targetScene and placements array",
            )
            .into());
        };
        check_paths(&[project.as_str(), target])?;
        if !placements.is_array() {
            return Err(RequestError::InvalidArgument {
                message: "Placements must be an array".to_string(),
                hint: "Provide an array of placement configurations".to_string(),
            }
            .into());
        }
        let root = require_scene_builder_project(&project)?;
        require_file(&root, target, FileKind::TargetScene)?;

        let params = Params::new()
            .with("targetScene", target)
            .with("placements", placements.clone())
            .into_value();
        let output = self
            .run_scene_builder_operation("place_items_batch", &params, &root, ACTION)
            .await?;
        scene_builder_failure(
            &output,
            ACTION,
            &["Check if the items exist", "Verify the target scene is valid"],
        )?;
        scene_builder_response(&output.stdout, Some("Batch placement completed."), ACTION)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn godot_path(&self) -> Result<String, ToolFailure> {
        Ok(self.resolver.resolve().await?)
    }

    async fn require_uid_capable(&self, godot: &str, action: &str) -> Result<(), ToolFailure> {
        let version = probe_version(self.runner.as_ref(), godot, self.version_timeout)
            .await
            .map_err(|e| ToolFailure::wrap(action, &e, EXECUTION_SUGGESTIONS))?;
        debug!(version = %version, "checked engine version");
        require_uid_support("UIDs", &version)?;
        Ok(())
    }

    async fn run_operation(
        &self,
        operation: &str,
        params: &Value,
        root: &Path,
        action: &str,
    ) -> Result<OperationOutput, ToolFailure> {
        self.execute(operation, params, root, action, EXECUTION_SUGGESTIONS)
            .await
    }

    async fn run_scene_builder_operation(
        &self,
        operation: &str,
        params: &Value,
        root: &Path,
        action: &str,
    ) -> Result<OperationOutput, ToolFailure> {
        self.execute(
            operation,
            params,
            root,
            action,
            SCENE_BUILDER_EXECUTION_SUGGESTIONS,
        )
        .await
    }

    async fn execute(
        &self,
        operation: &str,
        params: &Value,
        root: &Path,
        action: &str,
        suggestions: &[&str],
    ) -> Result<OperationOutput, ToolFailure> {
        let godot = self
            .resolver
            .resolve()
            .await
            .map_err(|e| ToolFailure::wrap(action, &e, suggestions))?;
        self.executor
            .execute(&godot, operation, params, root)
            .await
            .map_err(|e| ToolFailure::wrap(action, &e, suggestions))
    }

    /// The request's project path, else the configured default.
    fn scene_builder_project(&self, args: &ToolArgs) -> Result<String, ToolFailure> {
        if let Some(project) = args.str("projectPath") {
            return Ok(project.to_string());
        }
        if let Some(default) = &self.default_project {
            debug!(project = %default.display(), "using default project path");
            return Ok(default.display().to_string());
        }
        Err(ToolFailure::new(
            "Project path is required. Either provide projectPath or set GODOT_PROJECT_PATH environment variable.",
            &[PROJECT_PATH_HINT, "Set GODOT_PROJECT_PATH environment variable"],
        ))
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("resolver", &self.resolver)
            .field("executor", &self.executor)
            .field("default_project", &self.default_project)
            .finish_non_exhaustive()
    }
}

async fn list_projects(args: &ToolArgs) -> ToolResult {
    let directory = args.str("directory").ok_or_else(|| {
        ToolFailure::from(RequestError::missing(
            "Directory is required",
            "Provide a valid directory path to search for Godot projects",
        ))
    })?;
    if !is_safe_request_path(directory) {
        return Err(RequestError::unsafe_path("Invalid directory path").into());
    }
    let dir = PathBuf::from(directory);
    if !dir.exists() {
        return Err(RequestError::MissingFile {
            kind: FileKind::Directory,
            path: directory.to_string(),
        }
        .into());
    }

    let recursive = args.flag("recursive");
    debug!(directory, recursive, "listing Godot projects");
    let projects = tokio::task::spawn_blocking(move || find_projects(&dir, recursive))
        .await
        .map_err(|e| {
            ToolFailure::new(
                format!("Failed to list projects: {e}"),
                &[
                    "Ensure the directory exists and is accessible",
                    "Check if you have permission to read the directory",
                ],
            )
        })?;

    Ok(ToolResponse::json(&json!(projects)))
}

fn project_required() -> ToolFailure {
    RequestError::missing("Project path is required", PROJECT_PATH_HINT).into()
}

fn check_project_path(path: &str) -> Result<(), ToolFailure> {
    if is_safe_request_path(path) {
        Ok(())
    } else {
        Err(RequestError::unsafe_path("Invalid project path").into())
    }
}

fn check_paths(paths: &[&str]) -> Result<(), ToolFailure> {
    if paths.iter().all(|p| is_safe_request_path(p)) {
        Ok(())
    } else {
        Err(ToolFailure::new("Invalid path", &[UNSAFE_PATHS_HINT]))
    }
}

fn require_project(project: &str) -> Result<PathBuf, ToolFailure> {
    if is_godot_project(project) {
        Ok(PathBuf::from(project))
    } else {
        Err(RequestError::NotAProject {
            path: project.to_string(),
        }
        .into())
    }
}

fn require_scene_builder_project(project: &str) -> Result<PathBuf, ToolFailure> {
    if is_godot_project(project) {
        Ok(PathBuf::from(project))
    } else {
        Err(ToolFailure::new(
            format!("Not a valid Godot project: {project}"),
            &[NOT_A_PROJECT_HINT],
        ))
    }
}

fn require_file(root: &Path, relative: &str, kind: FileKind) -> Result<(), ToolFailure> {
    if project_file(root, relative).exists() {
        Ok(())
    } else {
        Err(RequestError::MissingFile {
            kind,
            path: relative.to_string(),
        }
        .into())
    }
}

fn core_failure(
    output: &OperationOutput,
    action: &str,
    suggestions: &[&str],
) -> Result<(), ToolFailure> {
    if output.stderr_has(FAILURE_MARKER) {
        Err(ToolFailure::reported(action, &output.stderr, suggestions))
    } else {
        Ok(())
    }
}

fn scene_builder_failure(
    output: &OperationOutput,
    action: &str,
    suggestions: &[&str],
) -> Result<(), ToolFailure> {
    if output.stderr_has(ERROR_MARKER) {
        Err(ToolFailure::reported(action, &output.stderr, suggestions))
    } else {
        Ok(())
    }
}

/// From the first `{` to the last `}` of `text`.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Pretty-print the JSON object embedded in scene-builder output, or pass
/// the output through when there is none.
fn scene_builder_response(stdout: &str, heading: Option<&str>, action: &str) -> ToolResult {
    let Some(span) = json_span(stdout) else {
        return Ok(ToolResponse::text(stdout));
    };
    let value: Value = serde_json::from_str(span).map_err(|e| {
        ToolFailure::new(format!("{action}: {e}"), SCENE_BUILDER_EXECUTION_SUGGESTIONS)
    })?;
    let body = pretty(&value);
    Ok(ToolResponse::text(match heading {
        Some(heading) => format!("{heading}\n\n{body}"),
        None => body,
    }))
}
