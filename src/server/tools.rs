//! Tool catalog advertised by `tools/list`

use serde_json::{Value, json};

const PROJECT_PATH_DESC: &str = "Path to the Godot project directory";
const OPTIONAL_PROJECT_PATH_DESC: &str =
    "Path to the Godot project directory (optional if GODOT_PROJECT_PATH env is set)";
const ROOT_DIR_DESC: &str =
    "Optional: Root directory for SceneBuilder data (default: res://Data/SceneBuilder/)";

/// Every tool the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    LaunchEditor,
    RunProject,
    GetDebugOutput,
    StopProject,
    GetGodotVersion,
    ListProjects,
    GetProjectInfo,
    CreateScene,
    AddNode,
    LoadSprite,
    ExportMeshLibrary,
    SaveScene,
    GetUid,
    UpdateProjectUids,
    ListSceneBuilderCollections,
    ListSceneBuilderItems,
    GetSceneBuilderItem,
    CreateSceneBuilderItem,
    PlaceSceneBuilderItem,
    PlaceSceneBuilderItemsBatch,
}

impl Tool {
    /// Catalog order.
    pub const ALL: [Tool; 20] = [
        Tool::LaunchEditor,
        Tool::RunProject,
        Tool::GetDebugOutput,
        Tool::StopProject,
        Tool::GetGodotVersion,
        Tool::ListProjects,
        Tool::GetProjectInfo,
        Tool::CreateScene,
        Tool::AddNode,
        Tool::LoadSprite,
        Tool::ExportMeshLibrary,
        Tool::SaveScene,
        Tool::GetUid,
        Tool::UpdateProjectUids,
        Tool::ListSceneBuilderCollections,
        Tool::ListSceneBuilderItems,
        Tool::GetSceneBuilderItem,
        Tool::CreateSceneBuilderItem,
        Tool::PlaceSceneBuilderItem,
        Tool::PlaceSceneBuilderItemsBatch,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LaunchEditor => "launch_editor",
            Self::RunProject => "run_project",
            Self::GetDebugOutput => "get_debug_output",
            Self::StopProject => "stop_project",
            Self::GetGodotVersion => "get_godot_version",
            Self::ListProjects => "list_projects",
            Self::GetProjectInfo => "get_project_info",
            Self::CreateScene => "create_scene",
            Self::AddNode => "add_node",
            Self::LoadSprite => "load_sprite",
            Self::ExportMeshLibrary => "export_mesh_library",
            Self::SaveScene => "save_scene",
            Self::GetUid => "get_uid",
            Self::UpdateProjectUids => "update_project_uids",
            Self::ListSceneBuilderCollections => "list_scene_builder_collections",
            Self::ListSceneBuilderItems => "list_scene_builder_items",
            Self::GetSceneBuilderItem => "get_scene_builder_item",
            Self::CreateSceneBuilderItem => "create_scene_builder_item",
            Self::PlaceSceneBuilderItem => "place_scene_builder_item",
            Self::PlaceSceneBuilderItemsBatch => "place_scene_builder_items_batch",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LaunchEditor => "Launch Godot editor for a specific project",
            Self::RunProject => "Run the Godot project and capture output",
            Self::GetDebugOutput => "Get the current debug output and errors",
            Self::StopProject => "Stop the currently running Godot project",
            Self::GetGodotVersion => "Get the installed Godot version",
            Self::ListProjects => "List Godot projects in a directory",
            Self::GetProjectInfo => "Retrieve metadata about a Godot project",
            Self::CreateScene => "Create a new Godot scene file",
            Self::AddNode => "Add a node to an existing scene",
            Self::LoadSprite => "Load a sprite into a Sprite2D node",
            Self::ExportMeshLibrary => "Export a scene as a MeshLibrary resource",
            Self::SaveScene => "Save changes to a scene file",
            Self::GetUid => "Get the UID for a specific file in a Godot project (for Godot 4.4+)",
            Self::UpdateProjectUids => {
                "Update UID references in a Godot project by resaving resources (for Godot 4.4+)"
            }
            Self::ListSceneBuilderCollections => {
                "List all SceneBuilder collections in a Godot project. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
            Self::ListSceneBuilderItems => {
                "List all items in a SceneBuilder collection. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
            Self::GetSceneBuilderItem => {
                "Get detailed information about a SceneBuilder item. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
            Self::CreateSceneBuilderItem => {
                "Create a new SceneBuilder item from an existing scene. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
            Self::PlaceSceneBuilderItem => {
                "Place a SceneBuilder item at a specific position in a scene. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
            Self::PlaceSceneBuilderItemsBatch => {
                "Place multiple SceneBuilder items in a scene at once. If GODOT_PROJECT_PATH env is set, projectPath is optional."
            }
        }
    }

    /// JSON Schema for the tool's arguments.
    #[must_use]
    pub fn input_schema(self) -> Value {
        match self {
            Self::LaunchEditor | Self::GetProjectInfo | Self::UpdateProjectUids => object(
                json!({"projectPath": string(PROJECT_PATH_DESC)}),
                &["projectPath"],
            ),
            Self::RunProject => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scene": string("Optional: Specific scene to run"),
                }),
                &["projectPath"],
            ),
            Self::GetDebugOutput | Self::StopProject | Self::GetGodotVersion => {
                object(json!({}), &[])
            }
            Self::ListProjects => object(
                json!({
                    "directory": string("Directory to search for Godot projects"),
                    "recursive": boolean("Whether to search recursively (default: false)"),
                }),
                &["directory"],
            ),
            Self::CreateScene => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scenePath": string("Path where the scene file will be saved (relative to project)"),
                    "rootNodeType": {
                        "type": "string",
                        "description": "Type of the root node (e.g., Node2D, Node3D)",
                        "default": "Node2D",
                    },
                }),
                &["projectPath", "scenePath"],
            ),
            Self::AddNode => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scenePath": string("Path to the scene file (relative to project)"),
                    "parentNodePath": {
                        "type": "string",
                        "description": "Path to the parent node (e.g., \"root\" or \"root/Player\")",
                        "default": "root",
                    },
                    "nodeType": string("Type of node to add (e.g., Sprite2D, CollisionShape2D)"),
                    "nodeName": string("Name for the new node"),
                    "properties": {
                        "type": "object",
                        "description": "Optional properties to set on the node",
                    },
                }),
                &["projectPath", "scenePath", "nodeType", "nodeName"],
            ),
            Self::LoadSprite => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scenePath": string("Path to the scene file (relative to project)"),
                    "nodePath": string("Path to the Sprite2D node (e.g., \"root/Player/Sprite2D\")"),
                    "texturePath": string("Path to the texture file (relative to project)"),
                }),
                &["projectPath", "scenePath", "nodePath", "texturePath"],
            ),
            Self::ExportMeshLibrary => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scenePath": string("Path to the scene file (.tscn) to export"),
                    "outputPath": string("Path where the mesh library (.res) will be saved"),
                    "meshItemNames": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional: Names of specific mesh items to include (defaults to all)",
                    },
                }),
                &["projectPath", "scenePath", "outputPath"],
            ),
            Self::SaveScene => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "scenePath": string("Path to the scene file (relative to project)"),
                    "newPath": string("Optional: New path to save the scene to (for creating variants)"),
                }),
                &["projectPath", "scenePath"],
            ),
            Self::GetUid => object(
                json!({
                    "projectPath": string(PROJECT_PATH_DESC),
                    "filePath": string("Path to the file (relative to project) for which to get the UID"),
                }),
                &["projectPath", "filePath"],
            ),
            Self::ListSceneBuilderCollections => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "rootDir": string(ROOT_DIR_DESC),
                }),
                &[],
            ),
            Self::ListSceneBuilderItems => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "collectionName": string("Name of the collection to list items from"),
                    "rootDir": string(ROOT_DIR_DESC),
                }),
                &["collectionName"],
            ),
            Self::GetSceneBuilderItem => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "collectionName": string("Name of the collection"),
                    "itemName": string("Name of the item"),
                    "rootDir": string(ROOT_DIR_DESC),
                }),
                &["collectionName", "itemName"],
            ),
            Self::CreateSceneBuilderItem => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "collectionName": string("Name of the collection to add the item to"),
                    "scenePath": string("Path to the scene file (relative to project)"),
                    "itemName": string("Optional: Name for the item (defaults to scene filename)"),
                    "useRandomVerticalOffset": boolean("Enable random vertical offset for placement"),
                    "useRandomRotation": boolean("Enable random rotation for placement"),
                    "useRandomScale": boolean("Enable random scale for placement"),
                    "randomOffsetYMin": number("Minimum random Y offset"),
                    "randomOffsetYMax": number("Maximum random Y offset"),
                    "randomRotX": number("Random rotation range for X axis (degrees)"),
                    "randomRotY": number("Random rotation range for Y axis (degrees)"),
                    "randomRotZ": number("Random rotation range for Z axis (degrees)"),
                    "randomScaleMin": number("Minimum random scale factor"),
                    "randomScaleMax": number("Maximum random scale factor"),
                    "rootDir": string(ROOT_DIR_DESC),
                }),
                &["collectionName", "scenePath"],
            ),
            Self::PlaceSceneBuilderItem => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "targetScene": string("Path to the target scene file (relative to project)"),
                    "collectionName": string("Name of the collection"),
                    "itemName": string("Name of the item to place"),
                    "position": vector3(Some("Position as {x, y, z}")),
                    "rotation": vector3(Some("Rotation in degrees as {x, y, z}")),
                    "scale": vector3(Some("Scale as {x, y, z} or a single number for uniform scale")),
                    "parentPath": string("Optional: Path to parent node (e.g., \"root/Level\")"),
                    "instanceName": string("Optional: Name for the placed instance"),
                    "applyRandomTransform": boolean("Apply random transform settings from the item"),
                }),
                &["targetScene", "collectionName", "itemName"],
            ),
            Self::PlaceSceneBuilderItemsBatch => object(
                json!({
                    "projectPath": string(OPTIONAL_PROJECT_PATH_DESC),
                    "targetScene": string("Path to the target scene file (relative to project)"),
                    "placements": {
                        "type": "array",
                        "description": "Array of placement configurations",
                        "items": {
                            "type": "object",
                            "properties": {
                                "collectionName": {"type": "string"},
                                "itemName": {"type": "string"},
                                "position": vector3(None),
                                "rotation": vector3(None),
                                "scale": vector3(None),
                                "parentPath": {"type": "string"},
                                "instanceName": {"type": "string"},
                                "applyRandomTransform": {"type": "boolean"},
                            },
                            "required": ["collectionName", "itemName"],
                        },
                    },
                }),
                &["targetScene", "placements"],
            ),
        }
    }

    /// Entry for the `tools/list` result.
    #[must_use]
    pub fn spec(self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

/// The full `tools/list` payload.
#[must_use]
pub fn tool_specs() -> Vec<Value> {
    Tool::ALL.into_iter().map(Tool::spec).collect()
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn number(description: &str) -> Value {
    json!({"type": "number", "description": description})
}

fn vector3(description: Option<&str>) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "x": {"type": "number"},
            "y": {"type": "number"},
            "z": {"type": "number"},
        },
    });
    if let Some(description) = description {
        schema["description"] = json!(description);
    }
    schema
}
