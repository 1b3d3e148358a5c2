use pretty_assertions::assert_eq;
use xmledit::{Document, NewElement, TreeOptions, XmlErrorKind};

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <!-- coordinates -->
    <groupId>org.example</groupId>
    <artifactId>widget</artifactId>
    <dependencies>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
        </dependency>
    </dependencies>
</project>
"#;

const BUILD: &str = r#"<project name="demo" default="dist">
    <property name="src" location="src" description="sources"/>
    <property name="build" location="build"/>
    <target name="dist" depends="compile">
        <jar destfile="dist/demo.jar" basedir="${build}"/>
    </target>
</project>
"#;

const MAVEN_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <artifactId>test-parent</artifactId>
        <groupId>test-parent-group-id</groupId>
        <version>test-parent-version</version>
    </parent>
    <artifactId>test-artifact</artifactId>
    <packaging>jar</packaging>
    <name>Test</name>
    <configuration>
        <items combine.children="append">
            <item>parent-1</item>
            <item>parent-2</item>
            <item>child-1</item>
        </items>
        <properties combine.self="override">
            <childKey>child</childKey>
        </properties>
    </configuration>
    <dependencies>
        <dependency>
            <groupId>com.google.guava</groupId>
            <artifactId>guava</artifactId>
            <version>18.0</version>
        </dependency>
        <!-- Test dependencies -->
        <dependency>
            <groupId>org.testng</groupId>
            <artifactId>testng</artifactId>
            <version>6.8</version>
            <scope>test</scope>
        </dependency>
        <dependency>
            <groupId>org.mockito</groupId>
            <artifactId>mockito-core</artifactId>
            <version>1.10.0</version>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>
"#;

const NAMED_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <artifactId>test-artifact</artifactId>
    <packaging>jar</packaging>
    <!-- project name -->
    <name>Test</name>
    <dependencies>
        <dependency>
            <artifactId>test-artifact</artifactId>
            <groupId>test-group</groupId>
            <version>test-version</version>
            <scope>compile</scope>
        </dependency>
    </dependencies>
</project>"#;

const ANT_BUILD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project name="MyProject" default="dist" basedir=".">
    <description>
        simple example build file
    </description>
  <!-- set global properties for this build -->
  <property name="src" location="src"/>
  <property name="build" location="build"/>
  <property name="dist"  location="dist"/>
  <target name="init">
    <!-- Create the time stamp -->
    <tstamp/>
    <!-- Create the build directory structure used by compile -->
    <mkdir dir="${build}"/>
  </target>
</project>"#;

fn parse(src: &str) -> Document {
    match Document::parse_str(src) {
        Ok(doc) => doc,
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn test_remove_takes_preceding_text() {
    let mut doc = parse("<root>text-before<test>text-inside</test>text-after</root>");
    doc.remove_element("/root/test").unwrap();
    assert_eq!(doc.as_str(), "<root>text-after</root>");
    assert_eq!(doc.root().text(), "text-after");
}

#[test]
fn test_remove_keeps_preceding_comment() {
    let mut doc = parse("<root><!--comment--><test>text-inside</test>text-after</root>");
    doc.remove_element("/root/test").unwrap();
    assert_eq!(doc.as_str(), "<root><!--comment-->text-after</root>");
    doc.verify_segments().unwrap();
}

#[test]
fn test_append_fourth_dependency_child() {
    let mut doc = parse(POM);
    let dependency = doc.get_single_element("//dependency").unwrap().unwrap().id();
    let before: Vec<String> = doc
        .element(dependency)
        .unwrap()
        .children()
        .map(|c| c.source().to_string())
        .collect();

    let scope = doc
        .append_child(dependency, &NewElement::with_text("scope", "compile"))
        .unwrap();

    let element = doc.element(dependency).unwrap();
    let children: Vec<_> = element.children().collect();
    assert_eq!(children.len(), 4);
    assert_eq!(children[3].id(), scope);
    assert_eq!(children[3].source(), "<scope>compile</scope>");

    let after: Vec<String> = children[..3].iter().map(|c| c.source().to_string()).collect();
    assert_eq!(before, after);

    let expected = POM.replace(
        "<version>4.13.2</version>\n",
        "<version>4.13.2</version>\n            <scope>compile</scope>\n",
    );
    assert_eq!(doc.as_str(), expected);
    doc.verify_segments().unwrap();
}

#[test]
fn test_change_attribute_value_reanchors() {
    let mut doc = parse(BUILD);
    let property = doc.get_single_element("/project/property[@name='src']").unwrap().unwrap().id();
    doc.set_attribute(property, "location", "src/main/java").unwrap();

    let expected = BUILD.replace(r#"location="src""#, r#"location="src/main/java""#);
    assert_eq!(doc.as_str(), expected);

    let element = doc.element(property).unwrap();
    let names: Vec<String> = element.attributes().map(|a| a.name().to_string()).collect();
    assert_eq!(names, ["name", "location", "description"]);
    assert_eq!(element.attribute("description").unwrap().source(), r#"description="sources""#);

    // Everything after the edit point still reads its own bytes
    let jar = doc.get_single_element("//jar").unwrap().unwrap();
    assert_eq!(jar.source(), r#"<jar destfile="dist/demo.jar" basedir="${build}"/>"#);
    assert_eq!(jar.attribute_value("basedir"), Some("${build}"));
    assert_eq!(
        doc.get_single_element("/project/property[2]").unwrap().unwrap().attribute_value("location"),
        Some("build")
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_edits_are_minimal() {
    let mut doc = parse(POM);
    doc.update_text("/project/artifactId", "gadget").unwrap();
    assert_eq!(doc.as_str(), POM.replace(">widget<", ">gadget<"));

    // Same text again changes nothing
    doc.update_text("/project/artifactId", "gadget").unwrap();
    assert_eq!(doc.as_str(), POM.replace(">widget<", ">gadget<"));

    doc.update_text("/project/artifactId", "widget").unwrap();
    assert_eq!(doc.as_str(), POM);
}

#[test]
fn test_insert_then_remove_restores_bytes() {
    let mut doc = parse(POM);
    let group = doc.get_single_element("/project/groupId").unwrap().unwrap().id();

    let version = doc.insert_after(group, &NewElement::with_text("version", "1.0")).unwrap();
    assert_eq!(
        doc.as_str(),
        POM.replace(
            "<groupId>org.example</groupId>\n",
            "<groupId>org.example</groupId>\n    <version>1.0</version>\n"
        )
    );
    assert_eq!(doc.get_single_text("/project/version").unwrap().as_deref(), Some("1.0"));

    doc.remove(version).unwrap();
    assert_eq!(doc.as_str(), POM);
    doc.verify_segments().unwrap();
}

#[test]
fn test_replace_dependency() {
    let mut doc = parse(POM);
    let dependency = doc.get_single_element("//dependency").unwrap().unwrap().id();
    let replacement = NewElement::with_children(
        "dependency",
        [
            NewElement::with_text("groupId", "org.slf4j"),
            NewElement::with_text("artifactId", "slf4j-api"),
        ],
    );
    doc.replace_with(dependency, &replacement).unwrap();

    assert_eq!(
        doc.as_str(),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <!-- coordinates -->
    <groupId>org.example</groupId>
    <artifactId>widget</artifactId>
    <dependencies>
        <dependency>
            <groupId>org.slf4j</groupId>
            <artifactId>slf4j-api</artifactId>
        </dependency>
    </dependencies>
</project>
"#
    );
    assert!(matches!(
        doc.element(dependency).unwrap_err().kind,
        XmlErrorKind::DetachedNode
    ));
    assert_eq!(doc.get_text("//dependency/artifactId").unwrap(), ["slf4j-api"]);
    doc.verify_segments().unwrap();
}

#[test]
fn test_namespaced_attributes() {
    let mut doc = parse(BUILD);
    let root = doc.root().id();

    let err = doc.set_attribute(root, "ivy:version", "2").unwrap_err();
    assert!(matches!(err.kind, XmlErrorKind::UnresolvedNamespacePrefix(_)));
    assert_eq!(doc.as_str(), BUILD);

    doc.set_attribute(root, "xmlns:ivy", "antlib:org.apache.ivy.ant").unwrap();
    doc.set_attribute(root, "ivy:version", "2").unwrap();
    assert!(doc.as_str().starts_with(
        r#"<project name="demo" default="dist" xmlns:ivy="antlib:org.apache.ivy.ant" ivy:version="2">"#
    ));
    assert_eq!(
        doc.root().attribute("ivy:version").unwrap().namespace_uri(),
        Some("antlib:org.apache.ivy.ant")
    );

    doc.remove_attribute(root, "ivy:version").unwrap();
    doc.remove_attribute(root, "xmlns:ivy").unwrap();
    assert_eq!(doc.as_str(), BUILD);
}

#[test]
fn test_single_lookups() {
    let doc = parse(BUILD);
    let root = doc.root();

    assert!(matches!(
        root.get_single_child("property").unwrap_err().kind,
        XmlErrorKind::AmbiguousMatch(_)
    ));
    assert!(matches!(
        doc.get_single_element("/project/property").unwrap_err().kind,
        XmlErrorKind::AmbiguousMatch(_)
    ));
    assert_eq!(root.get_single_child("target").unwrap().unwrap().attribute_value("depends"), Some("compile"));
    assert!(root.get_single_child("missing").unwrap().is_none());
    assert!(doc.get_single_element("/project/missing").unwrap().is_none());

    let target = root.get_single_child("target").unwrap().unwrap();
    assert!(!target.has_sibling("missing"));
    assert!(target.get_single_sibling("property").is_err());
}

#[test]
fn test_create_empty() {
    let mut doc = Document::create_empty("settings").unwrap();
    assert_eq!(doc.as_str(), "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<settings/>");
    assert!(doc.root().is_void());
    assert!(!doc.root().has_parent());

    let root = doc.root().id();
    doc.set_attribute(root, "version", "1").unwrap();
    assert_eq!(doc.as_str(), "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<settings version=\"1\"/>");

    let err = doc.append_child(root, &NewElement::new("profile")).unwrap_err();
    assert!(matches!(err.kind, XmlErrorKind::VoidElementOperation(_)));
}

#[test]
fn test_tab_indentation() {
    let src = "<a>\n\t<b>\n\t\t<c/>\n\t</b>\n</a>";
    let mut doc = parse(src).with_options(TreeOptions::default().with_indent("\t"));
    let b = doc.get_single_element("/a/b").unwrap().unwrap().id();
    doc.append_child(b, &NewElement::new("d")).unwrap();
    assert_eq!(doc.as_str(), "<a>\n\t<b>\n\t\t<c/>\n\t\t<d/>\n\t</b>\n</a>");
}

#[test]
fn test_malformed_sources() {
    for src in ["", "<a>", "<a></b>", "<a/><b/>", "text only"] {
        let err = Document::parse_str(src).unwrap_err();
        assert!(err.is_malformed_source(), "`{src}` gave {err}");
    }
}

#[test]
fn test_batch_update() {
    let mut doc = parse(MAVEN_POM);

    doc.remove_element("//parent").unwrap();
    let configuration = doc.get_single_element("//configuration").unwrap().unwrap().id();
    doc.remove(configuration).unwrap();

    let artifact = doc.get_single_element("/project/artifactId").unwrap().unwrap().id();
    doc.insert_before(artifact, &NewElement::with_text("groupId", "test-group")).unwrap();
    doc.insert_after(artifact, &NewElement::with_text("version", "test-version")).unwrap();

    let tests: Vec<_> = doc
        .get_elements("//dependency[scope='test']")
        .unwrap()
        .iter()
        .map(|e| e.id())
        .collect();
    assert_eq!(tests.len(), 2);
    for id in tests {
        doc.remove(id).unwrap();
    }

    let dependencies = doc.get_single_element("//dependencies").unwrap().unwrap().id();
    let junit = NewElement::with_children(
        "dependency",
        [
            NewElement::with_text("artifactId", "junit"),
            NewElement::with_text("groupId", "junit"),
            NewElement::with_text("version", "4.0"),
        ],
    );
    doc.append_child(dependencies, &junit).unwrap();
    doc.update_text("//dependency[artifactId='junit']/version", "4.1").unwrap();

    assert_eq!(
        doc.as_str(),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <groupId>test-group</groupId>
    <artifactId>test-artifact</artifactId>
    <version>test-version</version>
    <packaging>jar</packaging>
    <name>Test</name>
    <dependencies>
        <dependency>
            <groupId>com.google.guava</groupId>
            <artifactId>guava</artifactId>
            <version>18.0</version>
        </dependency>
        <!-- Test dependencies -->
        <dependency>
            <artifactId>junit</artifactId>
            <groupId>junit</groupId>
            <version>4.1</version>
        </dependency>
    </dependencies>
</project>
"#
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_remove_keeps_formatting() {
    let mut doc = parse(NAMED_POM);
    doc.remove_element("/project/dependencies/dependency[1]/scope").unwrap();
    assert_eq!(
        doc.as_str(),
        NAMED_POM.replace("            <scope>compile</scope>\n", "")
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_remove_with_children_keeps_formatting() {
    let mut doc = parse(NAMED_POM);
    doc.remove_element("/project/dependencies").unwrap();
    assert_eq!(
        doc.as_str(),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <artifactId>test-artifact</artifactId>
    <packaging>jar</packaging>
    <!-- project name -->
    <name>Test</name>
</project>"#
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_new_element_with_attributes() {
    let src = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <artifactId>test-artifact</artifactId>
    <packaging>jar</packaging>
    <!-- project name -->
    <name>Test</name>
    <dependencies>
    </dependencies>
</project>"#;
    let mut doc = parse(src);

    let mut dependency = NewElement::with_children(
        "dependency",
        [
            NewElement::with_text("artifactId", "test-artifact"),
            NewElement::with_text("groupId", "test-group"),
            NewElement::with_text("version", "test-version").with_attribute("attribute1", "value1"),
        ],
    );
    dependency
        .set_attribute("attribute1", "value1")
        .set_attribute("attribute2", "value2")
        .set_attribute("attribute3", "value3");

    let dependencies = doc.get_single_element("//dependencies").unwrap().unwrap().id();
    doc.append_child(dependencies, &dependency).unwrap();

    assert_eq!(
        doc.as_str(),
        src.replace(
            "    <dependencies>\n",
            r#"    <dependencies>
        <dependency attribute1="value1" attribute2="value2" attribute3="value3">
            <artifactId>test-artifact</artifactId>
            <groupId>test-group</groupId>
            <version attribute1="value1">test-version</version>
        </dependency>
"#
        )
    );
    assert_eq!(
        doc.get_single_text("/project/dependencies/dependency/artifactId").unwrap().as_deref(),
        Some("test-artifact")
    );
    let version = doc.get_single_element("//dependency/version").unwrap().unwrap();
    assert_eq!(version.attribute_value("attribute1"), Some("value1"));
    doc.verify_segments().unwrap();
}

#[test]
fn test_change_void_element_attribute() {
    let mut doc = parse(ANT_BUILD);
    let location = doc
        .get_single_element("//property[@name='build']")
        .unwrap()
        .unwrap()
        .attribute("location")
        .unwrap()
        .id();
    doc.set_attribute_value(location, "other-build").unwrap();

    // Segments after the edit still line up
    doc.remove_element("//tstamp").unwrap();

    assert_eq!(
        doc.as_str(),
        ANT_BUILD
            .replace(r#"location="build""#, r#"location="other-build""#)
            .replace("    <tstamp/>\n", "")
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_append_after_trailing_comment() {
    let mut doc = parse("<project>\n    <name>Test</name>\n    <!-- trailing -->\n</project>");
    let root = doc.root().id();
    doc.append_child(root, &NewElement::with_text("version", "1.0")).unwrap();
    assert_eq!(
        doc.as_str(),
        "<project>\n    <name>Test</name>\n    <!-- trailing -->\n    <version>1.0</version>\n</project>"
    );
    doc.verify_segments().unwrap();
}

#[test]
fn test_failed_update_changes_nothing() {
    let mut doc = parse(ANT_BUILD);
    let err = doc.update_text("/project/*", "x").unwrap_err();
    assert!(matches!(err.kind, XmlErrorKind::VoidElementOperation(_)));
    assert_eq!(doc.as_str(), ANT_BUILD);
    doc.verify_segments().unwrap();
}

#[test]
fn test_unknown_entities_kept() {
    let doc = parse("<a><b>&foo; &nbsp; &amp;</b></a>");
    assert_eq!(doc.get_single_text("/a/b").unwrap().as_deref(), Some("&foo; &nbsp; &"));
}
